//! Plain-text outline of a [`StructureTree`].

use super::expansion::ExpansionState;
use super::tree::{CourseNode, NodeAction, StructureTree, YearNode};

const INDENT: &str = "  ";

/// Render the tree as an indented outline. Collapsed nodes print only their
/// header line; `[+]`/`[-]` marks the expansion state.
pub fn render_tree(tree: &StructureTree, expansion: &ExpansionState) -> String {
    let mut out = String::new();

    if let Some(empty) = tree.empty {
        out.push_str(empty.message());
        out.push('\n');
        return out;
    }

    for dept in &tree.departments {
        let open = expansion.is_department_expanded(dept.department.id);
        out.push_str(&format!(
            "{} {} ({}){}\n",
            marker(open),
            dept.department.name,
            dept.department.code,
            actions_suffix(&dept.actions)
        ));
        if !open {
            continue;
        }
        if let Some(empty) = dept.empty {
            out.push_str(&format!("{INDENT}{}\n", empty.message()));
        }
        for group in &dept.course_types {
            let open = expansion.is_course_type_expanded(group.department_id, &group.course_type);
            out.push_str(&format!(
                "{INDENT}{} {} ({})\n",
                marker(open),
                group.course_type.label(),
                group.courses.len()
            ));
            if open {
                for course in &group.courses {
                    render_course(&mut out, course, expansion, 2);
                }
            }
        }
    }
    out
}

fn render_course(out: &mut String, node: &CourseNode, expansion: &ExpansionState, depth: usize) {
    let pad = INDENT.repeat(depth);
    let open = expansion.is_course_expanded(node.course.id);
    let inactive = if node.course.is_active { "" } else { " (inactive)" };
    out.push_str(&format!(
        "{pad}{} {} [{}]{inactive}{}\n",
        marker(open),
        node.course.name,
        node.course.code,
        actions_suffix(&node.actions)
    ));
    if !open {
        return;
    }
    if let Some(empty) = node.empty {
        out.push_str(&format!("{pad}{INDENT}{}\n", empty.message()));
    }
    for year in &node.years {
        render_year(out, year, expansion, depth + 1);
    }
}

fn render_year(out: &mut String, node: &YearNode, expansion: &ExpansionState, depth: usize) {
    let pad = INDENT.repeat(depth);
    let open = expansion.is_year_expanded(node.year.id);
    out.push_str(&format!(
        "{pad}{} {}{}\n",
        marker(open),
        year_title(node),
        actions_suffix(&node.actions)
    ));
    if !open {
        return;
    }
    if let Some(empty) = node.empty {
        out.push_str(&format!("{pad}{INDENT}{}\n", empty.message()));
    }
    for leaf in &node.sections {
        let s = &leaf.section;
        let session = s
            .academic_session
            .as_deref()
            .map(|session| format!(" {session}"))
            .unwrap_or_default();
        out.push_str(&format!(
            "{pad}{INDENT}- {} {}/{} {}{session}\n",
            s.name,
            s.current_students,
            s.max_students,
            s.status.as_str(),
        ));
    }
}

fn year_title(node: &YearNode) -> String {
    if node.year.year_name.is_empty() {
        format!("Year {}", node.year.year_number)
    } else {
        node.year.year_name.clone()
    }
}

fn marker(open: bool) -> &'static str {
    if open {
        "[-]"
    } else {
        "[+]"
    }
}

fn actions_suffix(actions: &[NodeAction]) -> String {
    if actions.is_empty() {
        return String::new();
    }
    let labels: Vec<&str> = actions.iter().map(NodeAction::label).collect();
    format!("  <{}>", labels.join(", "))
}
