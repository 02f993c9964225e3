//! saldo-advisor: budget advice from an external text-generation service.

pub mod advisor;
pub mod error;
pub mod gateway;
pub mod llm;
pub mod request;

pub use advisor::Advisor;
pub use error::{AdviceError, GatewayError};
pub use gateway::{AdviceGateway, CannedGateway};
pub use llm::{LlmAdviceGateway, LlmConfig, Provider};
pub use request::{AdviceRequest, AdviceResponse, ExpenseEntry, DEFAULT_TIME_PERIOD, MIN_GOALS_CHARS};
