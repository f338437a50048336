pub mod affiliate;
pub mod commission_rule;
pub mod coupon;
pub mod coupon_link;
pub mod earning;
pub mod store;
pub mod store_affiliate;
pub mod withdrawal_request;

pub use affiliate::AffiliateStatus;
pub use commission_rule::RuleAppliesTo;
pub use coupon::CouponScope;
pub use earning::EarningStatus;
pub use store_affiliate::{CommissionType, LinkStatus};
pub use withdrawal_request::WithdrawalStatus;
