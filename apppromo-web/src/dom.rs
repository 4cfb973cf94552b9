use apppromo_ui::dom::Dom;
use apppromo_ui::{BannerError, Result};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

fn dom_err(e: JsValue) -> BannerError {
    BannerError::Dom(format!("{:?}", e))
}

/// [`Dom`] backed by the browser document
pub struct WebDom {
    document: Document,
}

impl WebDom {
    pub fn new() -> std::result::Result<Self, JsValue> {
        let document = web_sys::window()
            .ok_or("no window")?
            .document()
            .ok_or("no document")?;
        Ok(Self::from_document(document))
    }

    pub fn from_document(document: Document) -> Self {
        Self { document }
    }
}

impl Dom for WebDom {
    type Element = Element;

    fn create_element(&self, tag: &str, attrs: &[(&str, &str)]) -> Result<Element> {
        let element = self.document.create_element(tag).map_err(dom_err)?;
        for (name, value) in attrs {
            element.set_attribute(name, value).map_err(dom_err)?;
        }
        Ok(element)
    }

    fn set_text(&self, element: &Element, text: &str) -> Result<()> {
        element.set_text_content(Some(text));
        Ok(())
    }

    fn append_child(&self, parent: &Element, child: &Element) -> Result<()> {
        parent.append_child(child).map_err(dom_err)?;
        Ok(())
    }

    fn add_class(&self, element: &Element, class: &str) -> Result<()> {
        element.class_list().add_1(class).map_err(dom_err)
    }

    fn set_style(&self, element: &Element, property: &str, value: &str) -> Result<()> {
        let html = element
            .dyn_ref::<HtmlElement>()
            .ok_or_else(|| BannerError::Dom(format!("<{}> has no inline style", element.tag_name())))?;
        html.style().set_property(property, value).map_err(dom_err)
    }

    fn clear_children(&self, element: &Element) -> Result<()> {
        element.set_inner_html("");
        Ok(())
    }
}
