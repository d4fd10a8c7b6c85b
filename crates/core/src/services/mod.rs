pub mod analytics_service;
pub mod breakdown_service;
pub mod bucketing;
pub mod chart_service;
pub mod grading;
pub mod import_service;
pub mod math;
pub mod position_service;
pub mod validation;
