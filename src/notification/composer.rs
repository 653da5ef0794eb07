//! 通知文案

use super::event::Category;

/// 未知类别的兜底文案
pub const FALLBACK_MESSAGE: &str = "We have an update for you!";

/// 按类别生成通知文案（不做个性化，只有是否发送是个性化的）
pub fn compose(category: &Category) -> &'static str {
    match category {
        Category::PaymentFailed => "Your recent payment failed. Want to try another card?",
        Category::OrderDelayed => "There’s a delay in your shipment. Track order here.",
        Category::LowBalance => "Your account balance is low. Would you like to top up?",
        Category::MarketingOffer => "Get 10% off your next purchase. Click to claim!",
        Category::InventoryBack => "An item on your wishlist is back in stock!",
        Category::Other(_) => FALLBACK_MESSAGE,
    }
}
