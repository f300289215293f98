//! Wire contracts between the sales analytics frontend and the analytics service.

pub mod dashboards;
pub mod enums;
pub mod usecases;
