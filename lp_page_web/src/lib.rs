//! Browser host for the `lp_page` behaviours.
//!
//! On load the module waits for `DOMContentLoaded`, runs the setup passes
//! against the live document and attaches a click listener per binding.
//! Pages that mark `<body data-lp-manual-init>` call `initPageBehaviors`
//! themselves, optionally with a configuration object.

use std::cell::{Cell, RefCell};
use std::cmp::Ordering;
use std::rc::Rc;

use lp_page::{dispatch, init_page, Collation, Dom, NoTooltips, PageConfig, PageError};
use lp_page::{ParameterRecord, Selector, TooltipToolkit};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{console, Document, Element, HtmlElement, HtmlInputElement, Window};

const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
const APP_COMMIT: &str = env!("GIT_COMMIT_HASH");

#[cfg(target_arch = "wasm32")]
const MANUAL_INIT_ATTR: &str = "data-lp-manual-init";

thread_local! {
    static ACTIVE_CONFIG: RefCell<Rc<PageConfig>> = RefCell::new(Rc::new(PageConfig::default()));
    static INSTALLED: Cell<bool> = const { Cell::new(false) };
}

/// True for the first caller only; listeners are bound once per page.
fn claim_install() -> bool {
    !INSTALLED.with(|installed| installed.replace(true))
}

fn active_config() -> Rc<PageConfig> {
    ACTIVE_CONFIG.with(|cell| Rc::clone(&cell.borrow()))
}

/// The live document seen through [`Dom`].
#[derive(Clone)]
pub struct WebDom {
    window: Window,
    document: Document,
    root: Element,
}

impl WebDom {
    pub fn from_window() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        let root = document.document_element()?;
        Some(Self {
            window,
            document,
            root,
        })
    }

    #[cfg(target_arch = "wasm32")]
    fn ready_state(&self) -> Option<String> {
        js_sys::Reflect::get(&self.document, &JsValue::from_str("readyState"))
            .ok()
            .and_then(|v| v.as_string())
    }
}

impl Dom for WebDom {
    type Node = Element;

    fn root(&self) -> Element {
        self.root.clone()
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Into::into)
    }

    fn query_all(&self, scope: &Element, selector: Selector<'_>) -> Vec<Element> {
        let Ok(list) = scope.query_selector_all(&selector.to_css()) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn query(&self, scope: &Element, selector: Selector<'_>) -> Option<Element> {
        scope.query_selector(&selector.to_css()).ok().flatten()
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn set_attribute(&mut self, node: &Element, name: &str, value: &str) {
        let _ = node.set_attribute(name, value);
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&mut self, node: &Element, class: &str) {
        let _ = node.class_list().add_1(class);
    }

    fn remove_class(&mut self, node: &Element, class: &str) {
        let _ = node.class_list().remove_1(class);
    }

    fn toggle_class(&mut self, node: &Element, class: &str) -> bool {
        node.class_list().toggle(class).unwrap_or(false)
    }

    fn set_style(&mut self, node: &Element, property: &str, value: &str) {
        if let Some(el) = node.dyn_ref::<HtmlElement>() {
            let _ = el.style().set_property(property, value);
        }
    }

    fn text_content(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn input_value(&self, node: &Element) -> Option<String> {
        node.dyn_ref::<HtmlInputElement>().map(HtmlInputElement::value)
    }

    fn create_element(&mut self, tag: &str) -> Option<Element> {
        self.document.create_element(tag).ok()
    }

    fn append_child(&mut self, parent: &Element, child: &Element) {
        let _ = parent.append_child(child);
    }

    fn remove_child(&mut self, parent: &Element, child: &Element) {
        let _ = parent.remove_child(child);
    }

    fn click(&mut self, node: &Element) {
        if let Some(el) = node.dyn_ref::<HtmlElement>() {
            el.click();
        }
    }

    fn alert(&mut self, message: &str) {
        let _ = self.window.alert_with_message(message);
    }
}

/// `bootstrap.Tooltip`, when the page loaded Bootstrap's bundle.
pub struct BootstrapTooltips {
    constructor: js_sys::Function,
}

impl BootstrapTooltips {
    pub fn detect() -> Option<Self> {
        let bootstrap = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("bootstrap"))
            .ok()
            .filter(|v| !v.is_undefined() && !v.is_null())?;
        let constructor = js_sys::Reflect::get(&bootstrap, &JsValue::from_str("Tooltip"))
            .ok()?
            .dyn_into::<js_sys::Function>()
            .ok()?;
        Some(Self { constructor })
    }
}

impl TooltipToolkit<Element> for BootstrapTooltips {
    fn attach(&mut self, element: &Element) {
        let args = js_sys::Array::of1(element);
        if let Err(err) = js_sys::Reflect::construct(&self.constructor, &args) {
            console::warn_2(&JsValue::from_str("tooltip construction failed"), &err);
        }
    }
}

/// zh-CN ordering through `String.prototype.localeCompare`.
pub struct ZhCollation {
    locales: js_sys::Array,
}

impl ZhCollation {
    pub fn new() -> Self {
        Self {
            locales: js_sys::Array::of1(&JsValue::from_str("zh-CN")),
        }
    }
}

impl Default for ZhCollation {
    fn default() -> Self {
        Self::new()
    }
}

impl Collation for ZhCollation {
    fn compare(&self, a: &str, b: &str) -> Ordering {
        js_sys::JsString::from(a)
            .locale_compare(b, &self.locales, &js_sys::Object::new())
            .cmp(&0)
    }
}

fn install(config: PageConfig) -> Result<(), JsValue> {
    let mut dom =
        WebDom::from_window().ok_or_else(|| JsValue::from_str("document unavailable"))?;
    if !claim_install() {
        return Err(JsValue::from_str("page behaviours already initialised"));
    }
    let config = Rc::new(config);
    ACTIVE_CONFIG.with(|cell| *cell.borrow_mut() = Rc::clone(&config));
    let collation = Rc::new(ZhCollation::new());

    let setup = match BootstrapTooltips::detect() {
        Some(mut toolkit) => init_page(&mut dom, &config, &mut toolkit),
        None => init_page(&mut dom, &config, &mut NoTooltips),
    };

    let bindings = setup.bindings.len();
    for binding in setup.bindings {
        let element = binding.element.clone();
        let mut dom = dom.clone();
        let config = Rc::clone(&config);
        let collation = Rc::clone(&collation);
        let handler = Closure::wrap(Box::new(move || {
            dispatch(&mut dom, &binding, &config, collation.as_ref());
        }) as Box<dyn FnMut()>);
        element.add_event_listener_with_callback("click", handler.as_ref().unchecked_ref())?;
        handler.forget();
    }

    console::info_1(&JsValue::from_str(&format!(
        "lp_page {} ready: {} progress bars, {} tooltips, {} click bindings",
        page_behaviors_version(),
        setup.progress_bars,
        setup.tooltips,
        bindings
    )));
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn auto_install() {
    let manual = WebDom::from_window()
        .and_then(|dom| dom.body())
        .is_some_and(|body| body.has_attribute(MANUAL_INIT_ATTR));
    if manual {
        return;
    }
    if let Err(err) = install(PageConfig::default()) {
        console::error_2(&JsValue::from_str("page behaviours failed to initialise"), &err);
    }
}

/// Run the setup passes now, with an optional configuration override.
/// Fails if the page is already initialised.
#[wasm_bindgen(js_name = initPageBehaviors)]
pub fn init_page_behaviors(config: JsValue) -> Result<(), JsValue> {
    let config = if config.is_undefined() || config.is_null() {
        PageConfig::default()
    } else {
        let config: PageConfig = serde_wasm_bindgen::from_value(config)?;
        config
            .validate()
            .map_err(|err| JsValue::from_str(&err.to_string()))?;
        config
    };
    install(config)
}

/// Download `parameters` as CSV. An empty or missing list alerts instead.
#[wasm_bindgen(js_name = exportParametersToCSV)]
pub fn export_parameters_to_csv(
    parameters: JsValue,
    filename: Option<String>,
) -> Result<(), JsValue> {
    let records: Option<Vec<ParameterRecord>> =
        if parameters.is_undefined() || parameters.is_null() {
            None
        } else {
            Some(serde_wasm_bindgen::from_value(parameters)?)
        };
    let mut dom =
        WebDom::from_window().ok_or_else(|| JsValue::from_str("document unavailable"))?;
    match lp_page::export_parameters_to_csv(
        &mut dom,
        records.as_deref(),
        filename.as_deref(),
        &active_config(),
    ) {
        Ok(_) | Err(PageError::NoParameters) => Ok(()),
        Err(err) => Err(JsValue::from_str(&err.to_string())),
    }
}

/// Submit hook for the parameter search form.
#[wasm_bindgen(js_name = validateSearchForm)]
pub fn validate_search_form() -> bool {
    WebDom::from_window()
        .map(|dom| lp_page::validate_search_form(&dom, &active_config()))
        .unwrap_or(true)
}

#[wasm_bindgen(js_name = pageBehaviorsVersion)]
pub fn page_behaviors_version() -> String {
    format!("{APP_VERSION} ({APP_COMMIT})")
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let Some(dom) = WebDom::from_window() else {
        return;
    };
    if dom.ready_state().as_deref() == Some("loading") {
        let ready = Closure::once_into_js(auto_install);
        let _ = dom
            .document
            .add_event_listener_with_callback("DOMContentLoaded", ready.unchecked_ref());
    } else {
        auto_install();
    }
}
