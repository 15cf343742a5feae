//! Server-side page rendering.
//!
//! DESIGN
//! ======
//! The page is rendered to a complete HTML document with Leptos `view!` in
//! SSR mode. No hydration: the grid is positioned by the stylesheet from
//! `grid::stylesheet`, and edit controls are plain forms posting back to the
//! same route. Edit controls only render when the page data says the
//! presented secret is valid, and they carry that secret in hidden `userId`
//! fields. Frame forms also send `returnTo=page` so a successful submission
//! redirects back here.

use leptos::prelude::*;
use uuid::Uuid;

use crate::grid;
use crate::services::mutation::{
    self, FIELD_COLLECTION_ID, FIELD_ID, FIELD_INTENT, FIELD_NAME, FIELD_RETURN_TO, FIELD_SECRET, FIELD_URL, RETURN_TO_PAGE,
};
use crate::services::page::{CollectionSummary, FrameView, PageData};

/// Page link for a collection. The secret is carried forward when present.
#[must_use]
pub fn collection_href(username: &str, collection_id: Uuid, secret: Option<&str>) -> String {
    match secret {
        Some(secret) => mutation::collection_location(username, collection_id, secret),
        None => format!("/{}?collectionId={collection_id}", urlencoding::encode(username)),
    }
}

fn action_href(username: &str) -> String {
    format!("/{}", urlencoding::encode(username))
}

/// Render the full HTML document for a loaded page.
///
/// `secret` is only honoured when `data.can_edit` is set.
#[must_use]
pub fn render_page(data: &PageData, secret: Option<&str>) -> String {
    let secret = secret.filter(|_| data.can_edit).map(str::to_owned);
    let layouts = grid::layout(&data.collection.frames);
    let css = grid::stylesheet(&layouts, secret.is_some());
    let title = format!("{}'s Frames", data.user.username);
    let data = data.clone();

    let owner = Owner::new();
    owner.with(move || {
        view! {
            <!DOCTYPE html>
            <html lang="en">
                <head>
                    <meta charset="utf-8"/>
                    <meta name="viewport" content="width=device-width, initial-scale=1"/>
                    <title>{title}</title>
                    <style inner_html=css></style>
                </head>
                <body>
                    <FramesPage data secret/>
                </body>
            </html>
        }
        .to_html()
    })
}

// =============================================================================
// COMPONENTS
// =============================================================================

#[component]
fn FramesPage(data: PageData, secret: Option<String>) -> impl IntoView {
    let first_run = data.is_first_run();
    let username = data.user.username.clone();

    view! {
        <main class="frames-page">
            {if first_run {
                view! {
                    <FirstRun
                        username=username.clone()
                        collection_id=data.collection.id
                        secret=secret.clone()
                    />
                }
                    .into_any()
            } else {
                view! {
                    <PageHeader
                        username=username.clone()
                        collections=data.collections.clone()
                        current=data.collection.id
                        secret=secret.clone()
                    />
                    <div class="frame-grid">
                        {data
                            .collection
                            .frames
                            .iter()
                            .map(|frame| {
                                view! {
                                    <FrameCell
                                        username=username.clone()
                                        frame=frame.clone()
                                        secret=secret.clone()
                                    />
                                }
                            })
                            .collect_view()}
                    </div>
                }
                    .into_any()
            }}
            <footer class="frames-page__footer">
                "Create your own with " <span class="logo">"reframe"</span>
            </footer>
        </main>
    }
}

/// Celebratory empty state for a brand-new user.
#[component]
fn FirstRun(username: String, collection_id: Uuid, secret: Option<String>) -> impl IntoView {
    view! {
        <div class="first-run">
            <h1 class="first-run__title">{format!("Welcome, {username}!")}</h1>
            <Instructions username=username.clone() secret=secret.clone()/>
            <p class="first-run__empty">"No frames yet..."</p>
            {secret
                .map(|secret| {
                    view! {
                        <p class="first-run__hint">"Click on \"Add new frame\" to add your first frame."</p>
                        <AddFrameForm username collection_id secret/>
                    }
                })}
        </div>
    }
}

#[component]
fn Instructions(username: String, secret: Option<String>) -> impl IntoView {
    let public_href = action_href(&username);
    view! {
        <div class="instructions">
            <p>"Share your page: " <a href=public_href.clone()>{public_href.clone()}</a></p>
            {secret
                .map(|_| {
                    view! {
                        <p class="instructions__secret">
                            "Keep this page's address private. It contains the secret that lets you edit."
                        </p>
                    }
                })}
        </div>
    }
}

#[component]
fn PageHeader(
    username: String,
    collections: Vec<CollectionSummary>,
    current: Uuid,
    secret: Option<String>,
) -> impl IntoView {
    view! {
        <header class="frames-page__header">
            <CollectionsNav
                username=username.clone()
                collections
                current
                secret=secret.clone()
            />
            <h1 class="frames-page__title">{format!("{username}'s Frames")}</h1>
            {secret.map(|secret| view! { <AddFrameForm username collection_id=current secret/> })}
        </header>
    }
}

#[component]
fn CollectionsNav(
    username: String,
    collections: Vec<CollectionSummary>,
    current: Uuid,
    secret: Option<String>,
) -> impl IntoView {
    let links = collections
        .into_iter()
        .map(|collection| {
            let href = collection_href(&username, collection.id, secret.as_deref());
            let active = collection.id == current;
            view! {
                <li>
                    <a class="collections-nav__link" class:collections-nav__link--active=active href=href>
                        {collection.name}
                    </a>
                </li>
            }
        })
        .collect_view();

    view! {
        <nav class="collections-nav">
            <ul>{links}</ul>
            {secret
                .map(|secret| {
                    view! {
                        <form class="collections-nav__create" method="post" action=action_href(&username)>
                            <input type="hidden" name=FIELD_INTENT value="create-collection"/>
                            <input type="hidden" name=FIELD_SECRET value=secret/>
                            <input type="text" name=FIELD_NAME placeholder="New collection" required=true/>
                            <button type="submit">"Create collection"</button>
                        </form>
                    }
                })}
        </nav>
    }
}

#[component]
fn AddFrameForm(username: String, collection_id: Uuid, secret: String) -> impl IntoView {
    view! {
        <form class="add-frame" method="post" action=action_href(&username)>
            <input type="hidden" name=FIELD_SECRET value=secret/>
            <input type="hidden" name=FIELD_RETURN_TO value=RETURN_TO_PAGE/>
            <input type="hidden" name=FIELD_COLLECTION_ID value=collection_id.to_string()/>
            <input type="url" name=FIELD_URL placeholder="Image URL"/>
            <input type="text" name="caption" placeholder="Caption"/>
            <GeometryInputs x=0 y=0 width=1 height=1/>
            <button type="submit">"Add new frame"</button>
        </form>
    }
}

#[component]
fn GeometryInputs(x: i32, y: i32, width: i32, height: i32) -> impl IntoView {
    view! {
        <input type="number" name="x" min="0" value=x.to_string()/>
        <input type="number" name="y" min="0" value=y.to_string()/>
        <input type="number" name="width" min="1" value=width.to_string()/>
        <input type="number" name="height" min="1" value=height.to_string()/>
    }
}

#[component]
fn FrameCell(username: String, frame: FrameView, secret: Option<String>) -> impl IntoView {
    let caption = frame
        .props
        .get("caption")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .to_owned();
    let has_image = !frame.url.is_empty();
    let url = frame.url.clone();
    let alt = caption.clone();
    let dom_id = grid::cell_dom_id(frame.id);

    view! {
        <div class="frame" id=dom_id>
            {has_image.then(|| view! { <img class="frame__image" src=url alt=alt/> })}
            {(!caption.is_empty()).then(|| view! { <p class="frame__caption">{caption.clone()}</p> })}
            {secret.map(|secret| view! { <FrameControls username frame secret/> })}
        </div>
    }
}

#[component]
fn FrameControls(username: String, frame: FrameView, secret: String) -> impl IntoView {
    let id = frame.id.to_string();
    let action = action_href(&username);
    let caption = frame
        .props
        .get("caption")
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .to_owned();

    view! {
        <div class="frame__controls">
            <form class="frame__update" method="post" action=action.clone()>
                <input type="hidden" name=FIELD_INTENT value="update"/>
                <input type="hidden" name=FIELD_SECRET value=secret.clone()/>
                <input type="hidden" name=FIELD_RETURN_TO value=RETURN_TO_PAGE/>
                <input type="hidden" name=FIELD_ID value=id.clone()/>
                <input type="url" name=FIELD_URL value=frame.url.clone()/>
                <input type="text" name="caption" value=caption/>
                <GeometryInputs x=frame.x y=frame.y width=frame.width height=frame.height/>
                <button type="submit">"Save"</button>
            </form>
            <form class="frame__delete" method="post" action=action>
                <input type="hidden" name=FIELD_INTENT value="delete"/>
                <input type="hidden" name=FIELD_SECRET value=secret/>
                <input type="hidden" name=FIELD_RETURN_TO value=RETURN_TO_PAGE/>
                <input type="hidden" name=FIELD_ID value=id/>
                <button type="submit">"Delete"</button>
            </form>
        </div>
    }
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
