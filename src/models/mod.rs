pub mod firestore;
pub mod notification;
pub mod payment;
pub mod response;
pub mod user;
