// Base trait and utilities for source adapters
pub mod base;

// Individual adapter implementations
pub mod losca_city_planning;
pub mod losca_health_commission;

// Re-export the main components
pub use base::{NormalizerUtils, SourceAdapter};
pub use losca_city_planning::LoscaCityPlanningAdapter;
pub use losca_health_commission::LoscaHealthCommissionAdapter;
