//! Tests for the routing system
//!
//! Validates route paths, role-gated page mapping and fallback handling.

#[cfg(test)]
mod tests {
    use crate::routes::MainRoute;
    use shared::navigation::{ENTRY_PATH, Page, landing_page};
    use shared::program::Category;
    use strum::IntoEnumIterator;
    use yew_router::Routable;

    /// Every page path is recognized as its route
    #[test]
    fn test_page_paths_match_routes() {
        for page in Page::ALL {
            let route = MainRoute::from(page);
            assert_eq!(route.to_path(), page.path());
            assert_eq!(MainRoute::recognize(page.path()), Some(route));
            assert_eq!(route.page(), Some(page));
        }
    }

    /// The entry path is the login form
    #[test]
    fn test_entry_path_is_login() {
        assert_eq!(MainRoute::recognize(ENTRY_PATH), Some(MainRoute::Login));
        assert_eq!(MainRoute::Login.page(), None);
    }

    /// Unknown paths fall back to the not-found route
    #[test]
    fn test_unknown_path_is_not_found() {
        assert_eq!(
            MainRoute::recognize("/admin"),
            Some(MainRoute::NotFound)
        );
    }

    /// Each role lands on a route it may open
    #[test]
    fn test_landing_routes() {
        assert_eq!(MainRoute::from(landing_page(true)), MainRoute::Trail);
        assert_eq!(MainRoute::from(landing_page(false)), MainRoute::Afternoon);
    }

    /// Only login and not-found have no page behind them
    #[test]
    fn test_route_pages() {
        let without_page: Vec<_> = MainRoute::iter()
            .filter(|route| route.page().is_none())
            .collect();
        assert_eq!(without_page, vec![MainRoute::Login, MainRoute::NotFound]);
    }

    /// Selection routes carry their category; the roster has none
    #[test]
    fn test_route_categories() {
        let category = |route: MainRoute| route.page().and_then(Page::category);
        assert_eq!(category(MainRoute::Trail), Some(Category::Trail));
        assert_eq!(category(MainRoute::Morning), Some(Category::Morning));
        assert_eq!(category(MainRoute::Afternoon), Some(Category::Afternoon));
        assert_eq!(category(MainRoute::Roster), None);
    }
}
