// ==========================================
// Доменный слой - сущности и типы
// ==========================================

pub mod entities;
pub mod types;

pub use entities::{Contract, JobType, OrderGroup, OrderItem, OrderWorker, Product, Worker};
pub use types::{DetectedTable, ImportPreset, TableKind, UpsertStats};
