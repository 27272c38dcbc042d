pub mod catalog;
pub mod reports;
pub mod sales;
pub mod surveys;
pub mod users;

pub use catalog::CatalogService;
pub use reports::ReportService;
pub use sales::SaleService;
pub use surveys::SurveyService;
pub use users::AdminUserService;
