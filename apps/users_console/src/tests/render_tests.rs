use super::*;
use client_core::PaginationController;

fn model(view_kind: ViewKind) -> ListViewModel {
    let mut pagination = PaginationController::default();
    pagination.set_total(7);
    ListViewModel {
        users: vec![
            UserRecord::new("u11", "Alex F.", true),
            UserRecord::new("u12", "Kirill G.", false),
        ],
        total: 7,
        view_kind,
        search_text: "e".into(),
        pagination,
        loading: false,
    }
}

#[test]
fn list_view_prints_one_row_per_user() {
    let text = render(&model(ViewKind::List));
    assert!(text.starts_with("users: 7 | page 1/2 | 5 per page | search 'e'\n"));
    assert!(text.contains("u12   Kirill G.      inactive"));
    assert!(text.contains("pages: [1] 2"));
    assert!(!text.contains('+'));
}

#[test]
fn card_view_boxes_each_user() {
    let text = render(&model(ViewKind::Cards));
    assert_eq!(text.matches("+------------------+").count(), 4);
    assert!(text.contains("| Alex F.          |"));
}

#[test]
fn empty_and_loading_states() {
    let mut model = ListViewModel {
        loading: true,
        ..ListViewModel::default()
    };
    let text = render(&model);
    assert!(text.contains("loading..."));
    assert!(text.contains("(no users)"));
    assert!(!text.contains("pages:"));

    model.loading = false;
    assert!(!render(&model).contains("loading"));
}

#[test]
fn single_user_line() {
    let user = UserRecord::new("u1", "Ivan Z.", true);
    assert_eq!(render_user(&user), "u1 Ivan Z. (active)");
}
