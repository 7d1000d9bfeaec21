// Analytics and planning
pub mod forecasting;
