//! Multi-line rendering of values for humans.
//!
//! The layout follows Python's `pprint.pformat` with its default settings: a
//! value that fits in the remaining width is written on one line, otherwise
//! its container breaks one item per line, aligned one column after the
//! opening bracket. Dict values continue after `key: `. The output is still a
//! valid expression and evaluates back to an equal value.

use crate::values::Value;

/// Line width used when the caller does not pick one.
pub const DEFAULT_WIDTH: usize = 80;

/// Render `value` within `width` columns where possible.
pub fn to_pretty_string(value: &Value, width: usize) -> String {
    let mut printer = PrettyPrinter {
        out: String::new(),
        width,
    };
    printer.format(value, 0, 0);
    printer.out
}

struct PrettyPrinter {
    out: String,
    width: usize,
}

impl PrettyPrinter {
    // `allowance` reserves room for closing brackets that will follow on the
    // same line.
    fn format(&mut self, value: &Value, indent: usize, allowance: usize) {
        let rep = value.to_string();
        let max_width = self.width.saturating_sub(indent + allowance);
        if rep.chars().count() <= max_width {
            self.out.push_str(&rep);
            return;
        }

        match value {
            Value::List(items) if !items.is_empty() => {
                self.out.push('[');
                self.format_items(items.iter(), items.len(), indent, allowance + 1);
                self.out.push(']');
            }
            Value::Tuple(items) if !items.is_empty() => {
                let end = if items.len() == 1 { ",)" } else { ")" };
                self.out.push('(');
                self.format_items(items.iter(), items.len(), indent, allowance + end.len());
                self.out.push_str(end);
            }
            Value::Set(items) if !items.is_empty() => {
                self.out.push('{');
                self.format_items(items.iter(), items.len(), indent, allowance + 1);
                self.out.push('}');
            }
            Value::Dict(mapping) if !mapping.is_empty() => {
                self.out.push('{');
                let indent = indent + 1;
                let allowance = allowance + 1;
                let last_index = mapping.len() - 1;
                for (i, (key, value)) in mapping.iter().enumerate() {
                    let last = i == last_index;
                    let key_rep = key.to_string();
                    self.out.push_str(&key_rep);
                    self.out.push_str(": ");
                    self.format(
                        value,
                        indent + key_rep.chars().count() + 2,
                        if last { allowance } else { 1 },
                    );
                    if !last {
                        self.newline(indent);
                    }
                }
                self.out.push('}');
            }
            _ => self.out.push_str(&rep),
        }
    }

    fn format_items<'v>(
        &mut self,
        items: impl Iterator<Item = &'v Value>,
        len: usize,
        indent: usize,
        allowance: usize,
    ) {
        let indent = indent + 1;
        for (i, item) in items.enumerate() {
            let last = i + 1 == len;
            if i > 0 {
                self.newline(indent);
            }
            self.format(item, indent, if last { allowance } else { 1 });
        }
    }

    fn newline(&mut self, indent: usize) {
        self.out.push_str(",\n");
        self.out.extend(core::iter::repeat_n(' ', indent));
    }
}
