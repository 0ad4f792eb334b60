use crate::error::ImbalancedParentheses;

pub fn is_valid(expression: &str) -> bool {
    check_parentheses(expression).is_ok()
}

/// Fails on the first `)` without an open partner, otherwise on the innermost
/// `(` still open at the end.
pub fn check_parentheses(expression: &str) -> Result<(), ImbalancedParentheses> {
    let mut open = Vec::new();
    for (offset, c) in expression.char_indices() {
        match c {
            '(' => open.push(offset),
            ')' => {
                if open.pop().is_none() {
                    return Err(ImbalancedParentheses::at(expression, offset, ')'));
                }
            }
            _ => {}
        }
    }
    match open.pop() {
        Some(offset) => Err(ImbalancedParentheses::at(expression, offset, '(')),
        None => Ok(()),
    }
}
