use crate::model::{ComponentModelTree, GeneratedComponentModel, MethodModel, ModelId};
use std::fmt::Write;

/// Renders an assembled model tree as an indented outline, one block per
/// generated type, children in subcomponent order.
pub fn format_outline(tree: &ComponentModelTree) -> String {
    let mut outliner = Outliner { tree, output: String::new() };

    if tree.is_empty() {
        let _ = writeln!(outliner.output, "Error: empty component model tree");
        return outliner.output;
    }
    let _ = writeln!(outliner.output, "COMPONENT MODEL for '{}':", tree.root().name);
    let _ = writeln!(outliner.output, "--------------------------------------------------");
    outliner.outline_model(tree.root_id(), 1, "");
    outliner.output
}

struct Outliner<'a> {
    tree: &'a ComponentModelTree,
    output: String,
}

impl<'a> Outliner<'a> {
    fn outline_model(&mut self, id: ModelId, level: usize, prefix: &str) {
        let model = self.tree.get(id);
        let marker = if model.is_abstract { " (abstract)" } else { "" };
        let _ = writeln!(self.output, "{}[L{}] {}{}", prefix, level, model.name, marker);

        let stem = build_child_stem(prefix);
        let rail = if model.subcomponents.is_empty() { "   " } else { "|  " };
        let detail = format!("{}{}", stem, rail);
        self.print_details(model, &detail);

        let children = &model.subcomponents;
        for (i, &child) in children.iter().enumerate() {
            let connector = if i == children.len() - 1 { "`-- " } else { "|-- " };
            self.outline_model(child, level + 1, &format!("{}{}", stem, connector));
        }
    }

    fn print_details(&mut self, model: &GeneratedComponentModel, detail: &str) {
        let supertypes: Vec<&str> = model.supertypes.iter().map(|t| t.as_str()).collect();
        let _ = writeln!(self.output, "{}supertypes: {}", detail, supertypes.join(", "));

        for nested in &model.types {
            let _ = writeln!(
                self.output,
                "{}type {} ({} fields, {} methods)",
                detail,
                nested.name,
                nested.fields.len(),
                nested.methods.len()
            );
        }
        for method in &model.factory_methods {
            let _ = writeln!(self.output, "{}factory {}", detail, format_method(method, model));
        }
        for method in &model.component_methods {
            let _ = writeln!(self.output, "{}method {}", detail, format_method(method, model));
        }
        for method in &model.initialize_methods {
            let _ = writeln!(self.output, "{}{} ({} statements)", detail, method.name, method.body.len());
        }
        if let Some(constructor) = &model.constructor {
            let _ = writeln!(self.output, "{}constructor {}", detail, format_method(constructor, model));
        }
    }
}

fn format_method(method: &MethodModel, owner: &GeneratedComponentModel) -> String {
    let mut rendered = String::new();
    for modifier in &method.modifiers {
        rendered.push_str(modifier.keyword());
        rendered.push(' ');
    }

    let name = if method.is_constructor() { owner.name.simple_name() } else { method.name.as_str() };
    let parameters: Vec<String> = method.parameters.iter().map(|p| format!("{} {}", p.type_name, p.name)).collect();
    let _ = write!(rendered, "{}({})", name, parameters.join(", "));

    if let Some(return_type) = &method.return_type {
        let _ = write!(rendered, " -> {}", return_type);
    }
    rendered
}

fn build_child_stem(current_prefix: &str) -> String {
    current_prefix.replace("`-- ", "    ").replace("|-- ", "|   ")
}
