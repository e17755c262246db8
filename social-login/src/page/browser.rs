use std::{cell::RefCell, rc::Rc};

use js_sys::{Function, Reflect, JSON};
use serde::Serialize;
use social_login_config::DispatcherSettings;
use tracing::{debug, Level};
use wasm_bindgen::{closure::Closure, prelude::wasm_bindgen, JsCast, JsValue};
use web_sys::{Document, Element, Event, HtmlInputElement, Window};

use crate::{
    core::{ClickHandler, LoginCallback},
    model::{AuthResponse, InitOptions, LoginOptions, LoginResponse, LoginStatus},
    util::install_console_logger,
    AppError, Dispatcher,
};

use super::{Button, ClickEvent, FacebookSdk, Page};

thread_local! {
    static DISPATCHER: RefCell<Option<Dispatcher>> = const { RefCell::new(None) };
}

/// Script entry point: injects the Facebook SDK and binds the login buttons
/// of the page the module was loaded into.
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    install_console_logger(Level::INFO);

    let page = BrowserPage::new()?;
    let sdk = BrowserFacebookSdk::new(page.window.clone());
    let dispatcher = Dispatcher::new(Rc::new(page), Rc::new(sdk), DispatcherSettings::default());

    let bound = dispatcher.start()?;
    debug!("Bound {} login buttons", bound);

    // Handlers only hold weak references; the dispatcher lives as long as the page.
    DISPATCHER.with(|slot| slot.borrow_mut().replace(dispatcher));
    Ok(())
}

impl From<AppError> for JsValue {
    fn from(error: AppError) -> Self {
        JsValue::from_str(&error.to_string())
    }
}

pub struct BrowserPage {
    window: Window,
    document: Document,
    buttons: RefCell<Vec<Element>>,
}

impl BrowserPage {
    /// # Errors
    ///
    /// Fails outside a browser window with a document.
    pub fn new() -> Result<Self, AppError> {
        let window = web_sys::window().ok_or_else(|| AppError::Script("no window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| AppError::Script("no document".to_string()))?;

        Ok(Self {
            window,
            document,
            buttons: RefCell::default(),
        })
    }

    fn element(&self, button: &Button) -> Result<Element, AppError> {
        self.buttons
            .borrow()
            .get(button.handle)
            .cloned()
            .ok_or_else(|| AppError::Script(format!("unknown button {}", button.handle)))
    }
}

impl Page for BrowserPage {
    fn field_value(&self, id: &str) -> Option<String> {
        self.document
            .get_element_by_id(id)?
            .dyn_into::<HtmlInputElement>()
            .ok()
            .map(|input| input.value())
    }

    fn buttons(&self, class: &str) -> Vec<Button> {
        let found = self.document.get_elements_by_class_name(class);
        let mut registry = self.buttons.borrow_mut();

        // An element keeps the handle it was first given.
        (0..found.length())
            .filter_map(|index| found.item(index))
            .map(|element| {
                let handle = match registry.iter().position(|known| *known == element) {
                    Some(handle) => handle,
                    None => {
                        registry.push(element);
                        registry.len() - 1
                    }
                };
                Button {
                    class: class.to_string(),
                    handle,
                }
            })
            .collect()
    }

    fn attribute(&self, button: &Button, name: &str) -> Option<String> {
        self.buttons.borrow().get(button.handle)?.get_attribute(name)
    }

    fn on_click(&self, button: &Button, handler: ClickHandler) -> Result<(), AppError> {
        let element = self.element(button)?;

        let listener = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            let mut click = ClickEvent::default();
            handler(&mut click);
            if click.is_default_prevented() {
                event.prevent_default();
            }
        });
        element.add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())?;
        // The listener stays registered for the life of the page.
        listener.forget();
        Ok(())
    }

    fn location_search(&self) -> String {
        self.window.location().search().unwrap_or_default()
    }

    fn replace_location(&self, url: &str) -> Result<(), AppError> {
        self.window.location().replace(url)?;
        Ok(())
    }

    fn has_element(&self, id: &str) -> bool {
        self.document.get_element_by_id(id).is_some()
    }

    fn insert_script(&self, id: &str, src: &str) -> Result<(), AppError> {
        let script = self.document.create_element("script")?;
        script.set_id(id);
        script.set_attribute("async", "")?;
        script.set_attribute("src", src)?;

        match self.document.get_elements_by_tag_name("script").item(0) {
            Some(first) => {
                let parent = first
                    .parent_node()
                    .ok_or_else(|| AppError::Script("script without parent".to_string()))?;
                parent.insert_before(&script, Some(&*first))?;
            }
            None => {
                let root = self
                    .document
                    .document_element()
                    .ok_or_else(|| AppError::Script("no document element".to_string()))?;
                root.append_child(&script)?;
            }
        }
        Ok(())
    }
}

/// Calls into `window.FB`, looked up on every call since the SDK script
/// loads after this module starts.
pub struct BrowserFacebookSdk {
    window: Window,
}

impl BrowserFacebookSdk {
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    fn fb(&self) -> Result<JsValue, AppError> {
        let fb = Reflect::get(&self.window, &JsValue::from_str("FB"))?;
        if fb.is_undefined() || fb.is_null() {
            return Err(AppError::Script("FB is not defined".to_string()));
        }
        Ok(fb)
    }

    fn method(fb: &JsValue, name: &str) -> Result<Function, AppError> {
        Reflect::get(fb, &JsValue::from_str(name))?
            .dyn_into::<Function>()
            .map_err(|_| AppError::Script(format!("FB.{} is not a function", name)))
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, AppError> {
    Ok(JSON::parse(&serde_json::to_string(value)?)?)
}

impl FacebookSdk for BrowserFacebookSdk {
    fn init(&self, options: &InitOptions) -> Result<(), AppError> {
        let fb = self.fb()?;
        Self::method(&fb, "init")?.call1(&fb, &to_js(options)?)?;
        Ok(())
    }

    fn login(&self, on_complete: LoginCallback, options: &LoginOptions) -> Result<(), AppError> {
        let fb = self.fb()?;

        let callback = Closure::once_into_js(move |response: JsValue| {
            let status = Reflect::get(&response, &JsValue::from_str("status"))
                .ok()
                .and_then(|status| status.as_string())
                .unwrap_or_default();
            let status = status
                .parse()
                .unwrap_or_else(|_| LoginStatus::Other(status.clone()));
            on_complete(LoginResponse { status });
        });

        Self::method(&fb, "login")?.call2(&fb, &callback, &to_js(options)?)?;
        Ok(())
    }

    fn auth_response(&self) -> Option<AuthResponse> {
        let fb = self.fb().ok()?;
        let response = Self::method(&fb, "getAuthResponse")
            .ok()?
            .call0(&fb)
            .ok()?;
        let access_token = Reflect::get(&response, &JsValue::from_str("accessToken"))
            .ok()?
            .as_string()?;
        Some(AuthResponse { access_token })
    }
}
