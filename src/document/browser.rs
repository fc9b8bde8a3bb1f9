//! Headless Chromium tab driven through `headless_chrome`.
//!
//! Element handles are resolved in page script on every call
//! (`document.querySelectorAll(selector)[index]`), mirroring how the page is
//! re-queried after each scroll round.

use std::ffi::OsStr;
use std::sync::Arc;
use std::time::Duration;

use headless_chrome::{Browser, LaunchOptions, Tab};
use serde_json::Value;

use super::{ElementRef, RenderableDocument};
use crate::error::{Error, Result};
use crate::options::Options;

/// A browser session with one tab on the listing.
pub struct BrowserDocument {
    // Dropping the browser closes the tab.
    _browser: Browser,
    tab: Arc<Tab>,
}

impl BrowserDocument {
    /// Launch Chromium. `options.headless` only changes the launch mode.
    pub fn launch(options: &Options) -> Result<Self> {
        let mut args: Vec<&OsStr> = vec![OsStr::new("--disable-blink-features=AutomationControlled")];
        if !options.headless {
            args.push(OsStr::new("--start-maximized"));
        }

        let launch = LaunchOptions::default_builder()
            .headless(options.headless)
            .window_size(Some((1400, 1000)))
            .idle_browser_timeout(Duration::from_secs(300))
            .args(args)
            .build()
            .map_err(|e| Error::Browser(e.to_string()))?;

        let browser = Browser::new(launch).map_err(|e| Error::Browser(e.to_string()))?;
        let tab = browser.new_tab().map_err(|e| Error::Browser(e.to_string()))?;
        tab.set_default_timeout(options.page_timeout);

        tracing::info!(headless = options.headless, "browser launched");
        Ok(Self { _browser: browser, tab })
    }

    fn eval(&self, body: &str) -> Result<Value> {
        let script = format!("(() => {{ {body} }})()");
        let object = self
            .tab
            .evaluate(&script, false)
            .map_err(|e| Error::Document(e.to_string()))?;
        Ok(object.value.unwrap_or(Value::Null))
    }
}

/// JavaScript string literal for `s`.
fn js_string(s: &str) -> String {
    Value::String(s.to_string()).to_string()
}

fn element_expr(element: &ElementRef) -> String {
    format!(
        "document.querySelectorAll({})[{}]",
        js_string(&element.selector),
        element.index
    )
}

/// Decode the attribute read's result.
///
/// Evaluation only hands back primitives by value, so the script wraps the
/// attribute in a one-element JSON array string. `None` means the element was
/// gone; `Some(None)` means it has no such attribute.
fn decode_attribute(value: &Value) -> Option<Option<String>> {
    let wrapped: Value = serde_json::from_str(value.as_str()?).ok()?;
    match wrapped.as_array().map(Vec::as_slice) {
        Some([Value::String(attr)]) => Some(Some(attr.clone())),
        Some([Value::Null]) => Some(None),
        _ => None,
    }
}

fn missing(element: &ElementRef) -> Error {
    Error::Document(format!("{element} is no longer rendered"))
}

impl RenderableDocument for BrowserDocument {
    fn navigate_to(&mut self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map(|_| ())
            .map_err(|e| Error::Navigation(e.to_string()))
    }

    fn wait_for_selector(&mut self, selector: &str, timeout: Duration) -> Result<ElementRef> {
        self.tab
            .wait_for_element_with_custom_timeout(selector, timeout)
            .map(|_| ElementRef::new(selector, 0))
            .map_err(|_| Error::Timeout {
                selector: selector.to_string(),
                waited: timeout,
            })
    }

    fn find_all(&mut self, selector: &str) -> Result<Vec<ElementRef>> {
        let len = self
            .eval(&format!("return document.querySelectorAll({}).length;", js_string(selector)))?
            .as_u64()
            .unwrap_or(0);
        let len = usize::try_from(len).unwrap_or(usize::MAX);
        Ok((0..len).map(|i| ElementRef::new(selector, i)).collect())
    }

    fn scroll_to_end(&mut self, container: &ElementRef) -> Result<()> {
        let done = self.eval(&format!(
            "const el = {}; if (!el) return false; el.scrollTo(0, el.scrollHeight); return true;",
            element_expr(container)
        ))?;
        if done.as_bool() == Some(true) {
            Ok(())
        } else {
            Err(missing(container))
        }
    }

    fn click(&mut self, element: &ElementRef) -> Result<()> {
        let done = self.eval(&format!(
            "const el = {}; if (!el) return false; el.click(); return true;",
            element_expr(element)
        ))?;
        if done.as_bool() == Some(true) {
            Ok(())
        } else {
            Err(missing(element))
        }
    }

    fn text(&mut self, element: &ElementRef) -> Result<String> {
        let value = self.eval(&format!(
            "const el = {}; return el ? el.innerText : null;",
            element_expr(element)
        ))?;
        value
            .as_str()
            .map(|s| s.trim().to_string())
            .ok_or_else(|| missing(element))
    }

    fn attribute(&mut self, element: &ElementRef, name: &str) -> Result<Option<String>> {
        let value = self.eval(&format!(
            "const el = {}; return el ? JSON.stringify([el.getAttribute({})]) : null;",
            element_expr(element),
            js_string(name)
        ))?;
        decode_attribute(&value).ok_or_else(|| missing(element))
    }

    fn page_source(&mut self) -> Result<String> {
        self.tab
            .get_content()
            .map_err(|e| Error::Document(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_string_escapes_quotes() {
        assert_eq!(js_string(r#"div[jslog="127691"]"#), r#""div[jslog=\"127691\"]""#);
    }

    #[test]
    fn test_decode_attribute() {
        let present = Value::String(r#"["ChZDSUhNMG9n\nS0VJ"]"#.to_string());
        let absent = Value::String("[null]".to_string());

        assert_eq!(decode_attribute(&present), Some(Some("ChZDSUhNMG9n\nS0VJ".to_string())));
        assert_eq!(decode_attribute(&absent), Some(None));
    }

    #[test]
    fn test_decode_attribute_missing_element() {
        // A vanished element evaluates to null, which comes back without a value.
        assert_eq!(decode_attribute(&Value::Null), None);
        assert_eq!(decode_attribute(&Value::String("not json".into())), None);
        assert_eq!(decode_attribute(&Value::String("[1]".into())), None);
    }

    #[test]
    fn test_element_expr() {
        let el = ElementRef::new("button.w8nwRe", 2);
        assert_eq!(element_expr(&el), r#"document.querySelectorAll("button.w8nwRe")[2]"#);
    }
}
