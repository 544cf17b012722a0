//! SQLx data layer: row structs and their query methods.

pub mod ml_model;
pub mod prediction_request;
pub mod transaction;
pub mod user;
pub mod user_action;

pub use ml_model::{MlModel, ModelInputType, ModelOutputType, NewMlModel};
pub use prediction_request::{
    NewPredictionRequest, PredictionRequest, RequestStats, RequestType, TerminalUpdate,
};
pub use transaction::{NewTransaction, Transaction, TransactionType};
pub use user::{NewUser, User};
pub use user_action::UserAction;
