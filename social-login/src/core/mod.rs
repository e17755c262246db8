use std::rc::Rc;

use crate::{
    model::LoginResponse,
    page::{ClickEvent, FacebookSdk, Page},
};

pub type SharedPage = Rc<dyn Page>;

pub type SharedSdk = Rc<dyn FacebookSdk>;

pub type ClickHandler = Box<dyn Fn(&mut ClickEvent)>;

pub type LoginCallback = Box<dyn FnOnce(LoginResponse)>;
