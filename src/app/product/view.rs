//! 文本渲染

use std::fmt::Write;

use super::model::{FormMode, Product};
use super::state::ViewState;

const HEADERS: [&str; 5] = ["ID", "Name", "Price", "Qty", "Description"];
/// 描述列最大显示宽度
const DESCRIPTION_WIDTH: usize = 40;

fn cells(product: &Product) -> [String; 5] {
    let description = product.description.clone().unwrap_or_default();
    [
        product.id.as_ref().map(|id| id.to_string()).unwrap_or_default(),
        product.name.clone().unwrap_or_default(),
        product.price.map(|p| p.to_string()).unwrap_or_default(),
        product.quantity.map(|q| q.to_string()).unwrap_or_default(),
        truncate(&description, DESCRIPTION_WIDTH),
    ]
}

fn truncate(text: &str, width: usize) -> String {
    let single_line = text.replace(['\n', '\r'], " ");
    if single_line.chars().count() <= width {
        single_line
    } else {
        let mut cut: String = single_line.chars().take(width - 1).collect();
        cut.push('…');
        cut
    }
}

fn write_row(out: &mut String, row: &[String], widths: &[usize]) {
    let line = row
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join(" | ");
    let _ = writeln!(out, "{}", line.trim_end());
}

/// 产品表格；列表为空时显示占位文本
pub fn render_table(products: &[Product]) -> String {
    if products.is_empty() {
        return "No products found.\n".to_string();
    }

    let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    let rows: Vec<[String; 5]> = products.iter().map(cells).collect();

    let mut widths: Vec<usize> = HEADERS.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    write_row(&mut out, &header, &widths);
    let rule = widths
        .iter()
        .map(|w| "-".repeat(*w))
        .collect::<Vec<_>>()
        .join("-+-");
    let _ = writeln!(out, "{}", rule);
    for row in &rows {
        write_row(&mut out, row, &widths);
    }
    out
}

/// 渲染完整视图：标题、列表区、表单区
pub fn render(state: &ViewState, title: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== {} ==", title);
    let _ = writeln!(out);

    let busy = if state.busy { " ⏳" } else { "" };
    let _ = writeln!(out, "Products{}", busy);
    if state.has_error() {
        let _ = writeln!(out, "! {}", state.error);
    }
    out.push_str(&render_table(&state.products));
    let _ = writeln!(out);

    let (heading, action) = match state.mode {
        FormMode::Creating => ("Add Product", "Create"),
        FormMode::Editing => ("Edit Product", "Update"),
    };
    let _ = writeln!(out, "{}", heading);
    let draft = &state.draft;
    let _ = writeln!(out, "  Name:        {}", draft.name);
    let _ = writeln!(out, "  Price:       {}", draft.price);
    let _ = writeln!(out, "  Quantity:    {}", draft.quantity);
    let _ = writeln!(out, "  Description: {}", draft.description);
    let _ = writeln!(out, "[{}] [Cancel]", action);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::product::model::ProductId;
    use crate::app::product::state::Action;

    fn pen() -> Product {
        Product {
            id: Some(ProductId::Number(1)),
            name: Some("Pen".to_string()),
            price: Some(1.5),
            quantity: Some(10),
            description: Some("Blue ink".to_string()),
        }
    }

    #[test]
    fn test_empty_list_placeholder() {
        let out = render(&ViewState::new(), "Product CRUD");
        assert!(out.starts_with("== Product CRUD =="));
        assert!(out.contains("No products found."));
        assert!(out.contains("Add Product"));
        assert!(out.contains("[Create]"));
    }

    #[test]
    fn test_table_rows() {
        let table = render_table(&[pen()]);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID | Name | Price | Qty | Description"));
        assert_eq!(lines[2], "1  | Pen  | 1.5   | 10  | Blue ink");
    }

    #[test]
    fn test_busy_error_and_edit_mode() {
        let state = ViewState::new().reduce([
            Action::Edit(pen()),
            Action::RequestStarted,
            Action::Failed("Save failed: Save failed: 500".to_string()),
        ]);
        let out = render(&state, "Shop");
        assert!(out.contains("Products ⏳"));
        assert!(out.contains("! Save failed: Save failed: 500"));
        assert!(out.contains("Edit Product"));
        assert!(out.contains("[Update]"));
        assert!(out.contains("  Price:       1.5"));
    }

    #[test]
    fn test_long_description_truncated() {
        let long = "x".repeat(100);
        assert_eq!(truncate(&long, 10).chars().count(), 10);
        assert_eq!(truncate("a\nb", 10), "a b");
    }
}
