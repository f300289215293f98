pub mod analytics;
pub mod chart_panel;
pub mod overview;
pub mod status_banner;

pub use analytics::SalesAnalyticsDashboard;
pub use overview::SalesOverviewDashboard;
