use std::fmt::Write as _;

use client_core::ListViewModel;
use shared::domain::{UserRecord, ViewKind};

pub fn render(model: &ListViewModel) -> String {
    let mut out = String::new();
    let pagination = &model.pagination;
    let _ = writeln!(
        out,
        "users: {} | page {}/{} | {} per page | search '{}'{}",
        model.total,
        pagination.current_page(),
        pagination.page_count(),
        pagination.items_per_page(),
        model.search_text,
        if model.loading { " | loading..." } else { "" },
    );

    if model.users.is_empty() {
        out.push_str("  (no users)\n");
    }
    for user in &model.users {
        match model.view_kind {
            ViewKind::List => {
                let _ = writeln!(
                    out,
                    "  {:<5} {:<14} {}",
                    user.id,
                    user.display_name,
                    status(user)
                );
            }
            ViewKind::Cards => {
                let _ = writeln!(out, "  +------------------+");
                let _ = writeln!(out, "  | {:<16} |", user.display_name);
                let _ = writeln!(out, "  | {:<5} {:>10} |", user.id, status(user));
                let _ = writeln!(out, "  +------------------+");
            }
        }
    }

    let pages: Vec<String> = pagination
        .pages()
        .into_iter()
        .map(|page| {
            if page == pagination.current_page() {
                format!("[{page}]")
            } else {
                page.to_string()
            }
        })
        .collect();
    if !pages.is_empty() {
        let _ = writeln!(out, "  pages: {}", pages.join(" "));
    }
    out
}

pub fn render_user(user: &UserRecord) -> String {
    format!("{} {} ({})", user.id, user.display_name, status(user))
}

fn status(user: &UserRecord) -> &'static str {
    if user.is_active {
        "active"
    } else {
        "inactive"
    }
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
