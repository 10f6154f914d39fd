pub mod auth;
pub mod google_auth;
pub mod messaging;
pub mod notification;
pub mod payment;
pub mod stripe;
pub mod user_store;

// 重新导出常用类型
pub use auth::{AuthService, Caller, CallerIdentity, TriggerInvoker};
pub use google_auth::GoogleTokenSource;
pub use messaging::{FcmClient, PushSender};
pub use notification::NotificationDispatchHandler;
pub use payment::PaymentIntentHandler;
pub use stripe::{PaymentProvider, StripeClient, StripeConfig};
pub use user_store::{FirestoreUserStore, UserStore};
