mod binder;

mod dispatcher;
pub use dispatcher::Dispatcher;

pub mod oauth2;

mod reader;
pub use reader::{strip_trailing_slash, PageConfigReader};

mod saml;
pub use saml::saml_login_url;
