//! saldo-core: transactions, the in-memory store, and dashboard aggregation

pub mod aggregation;
pub mod catalog;
pub mod export;
pub mod seed;
pub mod store;
pub mod transaction;
pub mod validation;
pub mod window;

pub use aggregation::{summarize, CategoryTotal, DashboardSummary};
pub use catalog::{catalog_for, is_known_category, EXPENSE_CATEGORIES, INCOME_SOURCES};
pub use export::{export_csv, export_csv_string};
pub use seed::demo_transactions;
pub use store::{StoreEvent, TransactionStore};
pub use transaction::{NewTransaction, Transaction, TransactionId, TransactionKind};
pub use validation::{
    validate, validate_replacement, Field, FieldError, TransactionInput, ValidationErrors,
    MAX_AMOUNT,
};
pub use window::{DateWindow, WindowError};
