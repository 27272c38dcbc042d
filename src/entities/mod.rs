pub mod admin_user;
pub mod login_event;
pub mod product;
pub mod sale;
pub mod sale_item;
pub mod survey;

pub use admin_user::Entity as AdminUser;
pub use login_event::Entity as LoginEvent;
pub use product::Entity as Product;
pub use sale::Entity as Sale;
pub use sale_item::Entity as SaleItem;
pub use survey::Entity as Survey;
