use bookmarks::Completion;
use bookmarks::in_flight::Region;
use bookmarks::page::{BookmarkFields, EventKind};
use bookmarks::platform::memory::{self, ItemId, MemoryClient, MemoryTarget};
use bookmarks::request::{Method, Request, Response};
use futures::executor::{LocalPool, block_on};
use futures::task::LocalSpawnExt;

const EDIT_FORM: &str = concat!(
    r#"<form id="save-form" method="post" action="/save/">"#,
    r#"<input id="id_url" name="url"><input id="id_title" name="title">"#,
    r#"<input id="id_tags" name="tags"><input type="submit" value="save">"#,
    "</form>",
);

const SAVED_ITEM: &str = concat!(
    r#"<li class="bookmarks"><a class="title" href="http://x.com">X</a> "#,
    r##"<a class="edit" href="#">[edit]</a></li>"##,
);

fn bookmark_html(href: &str, title: &str) -> String {
    format!(r#"<a class="title" href="{href}">{title}</a> <a class="edit" href="/save/">[edit]</a>"#)
}

fn x_fields() -> BookmarkFields {
    BookmarkFields {
        url: "http://x.com".to_string(),
        title: "X".to_string(),
        tags: "a,b".to_string(),
    }
}

struct Harness {
    client: MemoryClient,
    pool: LocalPool,
}

impl Harness {
    fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self {
            client: memory::client(),
            pool: LocalPool::new(),
        }
    }

    /// Dispatches an event and runs whatever can run; `true` if its default was prevented.
    fn dispatch(&mut self, kind: EventKind, target: MemoryTarget) -> bool {
        match self.client.handle_event(kind, &target) {
            Some(continuation) => {
                self.pool
                    .spawner()
                    .spawn_local(continuation)
                    .expect("spawn continuation");
                self.pool.run_until_stalled();
                true
            }
            None => false,
        }
    }

    fn respond(&mut self, index: usize, body: &str) {
        self.client.transport().respond(index, body);
        self.pool.run_until_stalled();
    }

    fn respond_status(&mut self, index: usize, status: u16, body: &str) {
        self.client.transport().respond_with(
            index,
            Response {
                status,
                body: body.to_string(),
            },
        );
        self.pool.run_until_stalled();
    }

    fn fail(&mut self, index: usize) {
        self.client.transport().fail(index, "connection reset");
        self.pool.run_until_stalled();
    }

    fn requests(&self) -> Vec<Request> {
        self.client.transport().requests()
    }

    /// Opens the edit form on `item` and fills it in; returns the index of the next request.
    fn open_editor(&mut self, item: ItemId, fields: BookmarkFields) -> usize {
        assert!(self.dispatch(EventKind::Click, MemoryTarget::EditLink(item)));
        let index = self.requests().len() - 1;
        self.respond(index, EDIT_FORM);
        self.client.page().fill_form(item, fields).unwrap();
        self.requests().len()
    }

    fn search(&mut self, query: &str) -> bool {
        self.client.page().set_query(query);
        self.dispatch(EventKind::Submit, MemoryTarget::SearchForm)
    }
}

#[test]
fn edit_click_fetches_form_for_bookmark_url() {
    let mut harness = Harness::new();
    let item = harness.client.page().push_item(bookmark_html("/b/3/", "Three"));

    assert!(harness.dispatch(EventKind::Click, MemoryTarget::EditLink(item)));
    assert_eq!(
        harness.requests(),
        vec![Request {
            method: Method::Get,
            url: "/save/?ajax&url=%2Fb%2F3%2F".to_string(),
            body: None,
        }]
    );
    assert!(harness.client.is_pending(Region::Bookmark(item.0)));

    harness.respond(0, EDIT_FORM);
    let edited = harness.client.page().item(item).unwrap();
    assert_eq!(edited.html, EDIT_FORM);
    assert_eq!(edited.form, Some(BookmarkFields::default()));
    assert!(!harness.client.is_pending(Region::Bookmark(item.0)));
}

#[test]
fn clicks_outside_edit_affordances_keep_their_default() {
    let mut harness = Harness::new();
    let item = harness.client.page().push_item(bookmark_html("/b/1/", "One"));

    assert!(!harness.dispatch(EventKind::Click, MemoryTarget::TitleLink(item)));
    assert!(!harness.dispatch(EventKind::Click, MemoryTarget::Elsewhere));
    assert!(!harness.dispatch(EventKind::Submit, MemoryTarget::Elsewhere));
    // No edit form yet, so there is nothing to save.
    assert!(!harness.dispatch(EventKind::Submit, MemoryTarget::SaveForm(item)));
    assert!(harness.requests().is_empty());
}

#[test]
fn item_without_title_link_is_ignored() {
    let mut harness = Harness::new();
    let item = harness
        .client
        .page()
        .push_item(r#"<a class="edit" href="/save/">[edit]</a>"#);

    assert!(harness.dispatch(EventKind::Click, MemoryTarget::EditLink(item)));
    assert!(harness.requests().is_empty());
    assert!(!harness.client.is_pending(Region::Bookmark(item.0)));
}

#[test]
fn save_posts_current_field_values() {
    let mut harness = Harness::new();
    let item = harness.client.page().push_item(bookmark_html("/b/3/", "Three"));
    let index = harness.open_editor(item, x_fields());

    assert!(harness.dispatch(EventKind::Submit, MemoryTarget::SaveForm(item)));
    assert_eq!(
        harness.requests()[index],
        Request {
            method: Method::Post,
            url: "/save/?ajax".to_string(),
            body: Some("url=http%3A%2F%2Fx.com&title=X&tags=a%2Cb".to_string()),
        }
    );
}

#[test]
fn failure_sentinel_alerts_and_keeps_the_form() {
    let mut harness = Harness::new();
    let item = harness.client.page().push_item(bookmark_html("/b/3/", "Three"));
    let index = harness.open_editor(item, x_fields());
    let before = harness.client.page().items();

    assert!(harness.dispatch(EventKind::Submit, MemoryTarget::SaveForm(item)));
    harness.respond(index, "failure");

    assert_eq!(
        harness.client.page().alerts(),
        vec!["Failed to validate bookmark before saving.".to_string()]
    );
    assert_eq!(harness.client.page().items(), before);
    assert_eq!(harness.client.page().item(item).unwrap().form, Some(x_fields()));
}

#[test]
fn saved_item_takes_the_old_items_place() {
    let mut harness = Harness::new();
    let page = harness.client.page();
    let first = page.push_item(bookmark_html("/b/1/", "One"));
    let item = page.push_item(bookmark_html("/b/3/", "Three"));
    let last = page.push_item(bookmark_html("/b/5/", "Five"));
    let index = harness.open_editor(item, x_fields());

    assert!(harness.dispatch(EventKind::Submit, MemoryTarget::SaveForm(item)));
    harness.respond(index, SAVED_ITEM);

    let items = harness.client.page().items();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].id, first);
    assert_eq!(items[1].html, SAVED_ITEM);
    assert_eq!(items[2].id, last);
    assert!(harness.client.page().item(item).is_none());
    assert!(harness.client.page().alerts().is_empty());
}

#[test]
fn first_list_item_of_a_rendered_list_is_used() {
    let mut harness = Harness::new();
    let item = harness.client.page().push_item(bookmark_html("/b/3/", "Three"));
    let index = harness.open_editor(item, x_fields());

    assert!(harness.dispatch(EventKind::Submit, MemoryTarget::SaveForm(item)));
    harness.respond(
        index,
        &format!("<ul class=\"bookmarks\">\n  {SAVED_ITEM}\n  <li>other</li>\n</ul>\n"),
    );

    let items = harness.client.page().items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].html, SAVED_ITEM);
}

#[test]
fn saved_item_is_editable_without_rebinding() {
    let mut harness = Harness::new();
    let item = harness.client.page().push_item(bookmark_html("/b/3/", "Three"));
    let index = harness.open_editor(item, x_fields());
    assert!(harness.dispatch(EventKind::Submit, MemoryTarget::SaveForm(item)));
    harness.respond(index, SAVED_ITEM);

    let saved = harness.client.page().items()[0].id;
    assert!(harness.dispatch(EventKind::Click, MemoryTarget::EditLink(saved)));
    assert_eq!(
        harness.requests().last().unwrap().url,
        "/save/?ajax&url=http%3A%2F%2Fx.com"
    );
    // The replaced item no longer receives events.
    assert!(!harness.dispatch(EventKind::Click, MemoryTarget::EditLink(item)));
}

#[test]
fn save_response_without_list_item_changes_nothing() {
    let mut harness = Harness::new();
    let item = harness.client.page().push_item(bookmark_html("/b/3/", "Three"));
    let index = harness.open_editor(item, x_fields());
    let before = harness.client.page().items();

    assert!(harness.dispatch(EventKind::Submit, MemoryTarget::SaveForm(item)));
    harness.respond(index, "<p>Bookmark saved.</p>");

    assert_eq!(harness.client.page().items(), before);
    assert!(harness.client.page().alerts().is_empty());
}

#[test]
fn save_error_status_keeps_the_bookmark() {
    let mut harness = Harness::new();
    let item = harness.client.page().push_item(bookmark_html("/b/3/", "Three"));
    let index = harness.open_editor(item, x_fields());
    let before = harness.client.page().items();

    assert!(harness.dispatch(EventKind::Submit, MemoryTarget::SaveForm(item)));
    harness.respond_status(
        index,
        403,
        "<h1>Forbidden</h1><ul><li>Your browser is accepting cookies.</li></ul>",
    );

    assert_eq!(harness.client.page().items(), before);
    assert_eq!(harness.client.page().item(item).unwrap().form, Some(x_fields()));
    assert!(harness.client.page().alerts().is_empty());
    assert!(!harness.client.is_pending(Region::Bookmark(item.0)));
}

#[test]
fn edit_error_status_keeps_the_item() {
    let mut harness = Harness::new();
    let html = bookmark_html("/b/3/", "Three");
    let item = harness.client.page().push_item(html.clone());

    assert!(harness.dispatch(EventKind::Click, MemoryTarget::EditLink(item)));
    harness.respond_status(0, 500, EDIT_FORM);

    let unchanged = harness.client.page().item(item).unwrap();
    assert_eq!(unchanged.html, html);
    assert_eq!(unchanged.form, None);
}

#[test]
fn edit_transport_failure_keeps_the_item() {
    let mut harness = Harness::new();
    let html = bookmark_html("/b/3/", "Three");
    let item = harness.client.page().push_item(html.clone());

    assert!(harness.dispatch(EventKind::Click, MemoryTarget::EditLink(item)));
    harness.fail(0);

    assert_eq!(harness.client.page().item(item).unwrap().html, html);
    assert!(!harness.client.is_pending(Region::Bookmark(item.0)));
}

#[test]
fn save_transport_failure_keeps_the_form() {
    let mut harness = Harness::new();
    let item = harness.client.page().push_item(bookmark_html("/b/3/", "Three"));
    let index = harness.open_editor(item, x_fields());
    let before = harness.client.page().items();

    assert!(harness.dispatch(EventKind::Submit, MemoryTarget::SaveForm(item)));
    harness.fail(index);

    assert_eq!(harness.client.page().items(), before);
    assert_eq!(harness.client.page().item(item).unwrap().form, Some(x_fields()));
    assert!(harness.client.page().alerts().is_empty());
    assert!(!harness.client.is_pending(Region::Bookmark(item.0)));
}

#[test]
fn older_save_resolving_last_is_dropped() {
    let mut harness = Harness::new();
    let item = harness.client.page().push_item(bookmark_html("/b/3/", "Three"));
    let index = harness.open_editor(item, x_fields());

    assert!(harness.dispatch(EventKind::Submit, MemoryTarget::SaveForm(item)));
    assert!(harness.dispatch(EventKind::Submit, MemoryTarget::SaveForm(item)));
    harness.respond(index + 1, "failure");
    harness.respond(index, SAVED_ITEM);

    assert_eq!(harness.client.page().alerts().len(), 1);
    assert_eq!(harness.client.page().item(item).unwrap().form, Some(x_fields()));
    assert_eq!(harness.client.page().items().len(), 1);
}

#[test]
fn edit_click_supersedes_a_pending_save() {
    let mut harness = Harness::new();
    let item = harness.client.page().push_item(bookmark_html("/b/3/", "Three"));
    let index = harness.open_editor(item, x_fields());

    assert!(harness.dispatch(EventKind::Submit, MemoryTarget::SaveForm(item)));
    assert!(harness.dispatch(EventKind::Click, MemoryTarget::EditLink(item)));
    assert_eq!(harness.requests()[index + 1].method, Method::Get);
    harness.respond(index + 1, EDIT_FORM);
    harness.respond(index, SAVED_ITEM);

    // Same region: the save's late answer does not replace the item.
    assert!(harness.client.page().item(item).is_some());
    assert_eq!(harness.client.page().items().len(), 1);
    assert!(!harness.client.is_pending(Region::Bookmark(item.0)));
}

#[test]
fn search_replaces_results_verbatim() {
    let mut harness = Harness::new();
    let body = "<ul class=\"bookmarks\"><li>cat pictures</li></ul>\n";

    assert!(harness.search("cats"));
    assert_eq!(
        harness.requests(),
        vec![Request {
            method: Method::Get,
            url: "/search/?ajax&query=cats".to_string(),
            body: None,
        }]
    );
    harness.respond(0, body);
    assert_eq!(harness.client.page().results_html(), body);

    // Same query, same answer, same page.
    assert!(harness.search("cats"));
    harness.respond(1, body);
    assert_eq!(harness.client.page().results_html(), body);
    assert_eq!(harness.requests()[1].url, harness.requests()[0].url);
}

#[test]
fn empty_search_response_empties_results() {
    let mut harness = Harness::new();
    assert!(harness.search("cats"));
    harness.respond(0, "<li>cat</li>");
    assert!(harness.search("zebras"));
    harness.respond(1, "");
    assert_eq!(harness.client.page().results_html(), "");
}

#[test]
fn error_status_body_still_becomes_results() {
    let mut harness = Harness::new();
    assert!(harness.search("cats"));
    harness.client.transport().respond_with(
        0,
        Response {
            status: 500,
            body: "<p>Server error</p>".to_string(),
        },
    );
    harness.pool.run_until_stalled();
    assert_eq!(harness.client.page().results_html(), "<p>Server error</p>");
}

#[test]
fn transport_failure_leaves_results_alone() {
    let mut harness = Harness::new();
    assert!(harness.search("cats"));
    harness.respond(0, "<li>cat</li>");

    assert!(harness.search("dogs"));
    harness.client.transport().fail(1, "connection reset");
    harness.pool.run_until_stalled();

    assert_eq!(harness.client.page().results_html(), "<li>cat</li>");
    assert!(!harness.client.is_pending(Region::SearchResults));
}

#[test]
fn latest_search_wins_whatever_the_resolution_order() {
    for newest_first in [true, false] {
        let mut harness = Harness::new();
        assert!(harness.search("ca"));
        assert!(harness.search("cats"));

        if newest_first {
            harness.respond(1, "<li>cats</li>");
            harness.respond(0, "<li>ca</li>");
        } else {
            harness.respond(0, "<li>ca</li>");
            harness.respond(1, "<li>cats</li>");
        }
        assert_eq!(harness.client.page().results_html(), "<li>cats</li>");
    }
}

#[test]
fn stale_continuation_reports_stale() {
    let harness = Harness::new();
    harness.client.page().set_query("ca");
    let older = harness.client.search();
    harness.client.page().set_query("cats");
    let newer = harness.client.search();

    harness.client.transport().respond(1, "<li>cats</li>");
    harness.client.transport().respond(0, "<li>ca</li>");
    let (older, newer) = block_on(futures::future::join(older, newer));

    assert_eq!(older.unwrap(), Completion::Stale);
    assert_eq!(newer.unwrap(), Completion::Applied);
    assert_eq!(harness.client.page().results_html(), "<li>cats</li>");
}

#[test]
fn repeated_edit_clicks_apply_the_latest_form() {
    let mut harness = Harness::new();
    let item = harness.client.page().push_item(bookmark_html("/b/3/", "Three"));

    assert!(harness.dispatch(EventKind::Click, MemoryTarget::EditLink(item)));
    assert!(harness.dispatch(EventKind::Click, MemoryTarget::EditLink(item)));
    harness.respond(1, EDIT_FORM);
    harness.respond(0, "<p>old form</p>");

    assert_eq!(harness.client.page().item(item).unwrap().html, EDIT_FORM);
}

#[test]
fn regions_do_not_cancel_each_other() {
    let mut harness = Harness::new();
    let page = harness.client.page();
    let one = page.push_item(bookmark_html("/b/1/", "One"));
    let two = page.push_item(bookmark_html("/b/2/", "Two"));

    assert!(harness.dispatch(EventKind::Click, MemoryTarget::EditLink(one)));
    assert!(harness.dispatch(EventKind::Click, MemoryTarget::EditLink(two)));
    assert!(harness.search("cats"));
    assert_eq!(harness.client.transport().unanswered(), 3);

    harness.respond(2, "<li>cat</li>");
    harness.respond(1, EDIT_FORM);
    harness.respond(0, EDIT_FORM);

    assert_eq!(harness.client.page().results_html(), "<li>cat</li>");
    assert!(harness.client.page().item(one).unwrap().form.is_some());
    assert!(harness.client.page().item(two).unwrap().form.is_some());
}
