use crate::containers::header::Header;
use crate::routes::MainRoute;
use web_sys::window;
use yew::{Children, Html, Properties, classes, function_component, html, use_effect_with};

#[derive(Properties, PartialEq)]
pub struct LayoutProps {
    pub children: Children,
    #[prop_or_default]
    pub current_route: Option<MainRoute>,
}

#[function_component(Layout)]
pub fn layout(props: &LayoutProps) -> Html {
    // Adds data-theme attribute to html tag for theme support
    use_effect_with((), |()| {
        if let Some(html_element) = window()
            .and_then(|window| window.document())
            .and_then(|document| document.document_element())
            && html_element.set_attribute("data-theme", "light").is_err()
        {
            tracing::warn!("could not set page theme");
        }
        || {}
    });

    html! {
    <>
        <Header current_route={props.current_route} />
        <div class="min-h-screen bg-base-100">
            <main class={classes!(
                "container",
                "mx-auto",
                "flex-grow",
                "p-4",
                "transition-all",
                "duration-300"
            )}>
                {props.children.clone()}
            </main>
            <footer class="footer footer-center p-4 border-t border-base-300 text-base-content">
                <div>
                    <p>{"© 2025 ZLET · Zveza tabornikov Slovenije"}</p>
                </div>
            </footer>
        </div>
    </>
    }
}
