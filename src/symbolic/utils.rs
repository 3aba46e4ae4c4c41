// the collection of utility functions mainly for bracket parsing and proceeding
// all positions are byte offsets; callers make sure the input is ASCII

/// true if every '(' has a matching ')' and no ')' comes first
pub fn brackets_balanced(s: &str) -> bool {
    let mut depth: i64 = 0;
    for c in s.chars() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth < 0 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

/// positions of `target_char` that are not enclosed in any brackets
pub fn find_char_positions_outside_brackets(input: &str, target_char: char) -> Vec<usize> {
    let mut depth = 0usize;
    let mut positions = Vec::new();
    for (i, ch) in input.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if ch == target_char && depth == 0 => positions.push(i),
            _ => {}
        }
    }
    positions
}

/// rightmost occurrence of any of `operators` at bracket depth 0 accepted by `accept`
pub fn find_rightmost_operator_outside_brackets(
    input: &str,
    operators: &[char],
    accept: impl Fn(usize) -> bool,
) -> Option<(usize, char)> {
    let mut depth = 0usize;
    let mut last = None;
    for (i, c) in input.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            _ if depth == 0 && operators.contains(&c) && accept(i) => last = Some((i, c)),
            _ => {}
        }
    }
    last
}

/// position of the bracket closing the one opened at `bracket_start`
pub fn find_pair_to_this_bracket(input: &str, bracket_start: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (i, c) in input.char_indices().skip_while(|(i, _)| *i < bracket_start) {
        if c == '(' {
            depth += 1;
        } else if c == ')' {
            depth = depth.checked_sub(1)?;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// true when the whole string is one bracketed group, e.g. "(x+1)" but not "(x)+(y)"
pub fn wrapped_in_brackets(input: &str) -> bool {
    input.starts_with('(') && find_pair_to_this_bracket(input, 0) == Some(input.len() - 1)
}
