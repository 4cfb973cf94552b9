#[cfg(target_arch = "wasm32")]
mod wasm_banner_tests {
    use apppromo_ui::cookie::{CookieOptions, CookieStore};
    use apppromo_ui::dom::Dom;
    use apppromo_web::{DocumentCookieStore, WebDom};
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_web_dom_builds_and_clears() {
        let dom = WebDom::new().unwrap();
        let root = dom.create_element("div", &[("id", "root")]).unwrap();
        let child = dom
            .create_element("span", &[("class", "progress"), ("style", "width:40%")])
            .unwrap();
        dom.append_child(&root, &child).unwrap();
        dom.add_class(&root, "appPromotion").unwrap();

        assert!(root.class_list().contains("appPromotion"));
        assert_eq!(root.child_element_count(), 1);

        dom.clear_children(&root).unwrap();
        assert_eq!(root.child_element_count(), 0);
    }

    #[wasm_bindgen_test]
    fn test_document_cookie_round_trip() {
        let store = DocumentCookieStore::new().unwrap();
        store
            .set("andAppPromotionwasm", "noShow", &CookieOptions::default())
            .unwrap();
        assert_eq!(
            store.get("andAppPromotionwasm").unwrap().as_deref(),
            Some("noShow")
        );
    }
}
