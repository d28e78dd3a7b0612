//! Splitting reply text into blocks that fit the chat platform's message cap.
//!
//! Lines are packed greedily: a line joins the current block (separated by a
//! newline) only if the result stays within the limit, otherwise the block is
//! closed first. Blocks therefore never end or start mid-line, and joining the
//! returned blocks with `\n` gives back the original text. Lengths are counted
//! in `char`s, which is how the platform counts.
//!
//! A single line longer than the limit cannot be honoured whole; it is cut on
//! `char` boundaries into limit-sized blocks of its own.

/// Hard per-message character cap of the chat platform.
pub const MESSAGE_CHARACTER_LIMIT: usize = 2000;

/// Pack `lines` into blocks of at most `limit` characters.
pub fn paginate<I, S>(lines: I, limit: usize) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let limit = limit.max(1);
    let mut blocks = Vec::new();
    let mut current: Option<(String, usize)> = None;

    for line in lines {
        let line = line.as_ref();
        let line_len = line.chars().count();

        if line_len > limit {
            if let Some((block, _)) = current.take() {
                blocks.push(block);
            }
            blocks.extend(split_chars(line, limit));
            continue;
        }

        current = match current.take() {
            None => Some((line.to_string(), line_len)),
            Some((block, len)) if len + 1 + line_len > limit => {
                blocks.push(block);
                Some((line.to_string(), line_len))
            }
            Some((mut block, len)) => {
                block.push('\n');
                block.push_str(line);
                Some((block, len + 1 + line_len))
            }
        };
    }
    if let Some((block, _)) = current {
        blocks.push(block);
    }
    blocks
}

/// [paginate] with [MESSAGE_CHARACTER_LIMIT].
pub fn paginate_message<I, S>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    paginate(lines, MESSAGE_CHARACTER_LIMIT)
}

fn split_chars(line: &str, limit: usize) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    chars
        .chunks(limit)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_input_is_one_block() {
        let blocks = paginate(["a", "b", "c"], 100);
        assert_eq!(blocks, vec!["a\nb\nc".to_string()]);
    }

    #[test]
    fn budget_checked_before_append() {
        // "aaaa\nbbbb" is exactly 9 chars; a third line must start a new block.
        let blocks = paginate(["aaaa", "bbbb", "cc"], 9);
        assert_eq!(blocks, vec!["aaaa\nbbbb".to_string(), "cc".to_string()]);
    }

    #[test]
    fn overlong_line_is_cut_on_char_boundaries() {
        let blocks = paginate(["ok", "ééééé"], 2);
        assert_eq!(blocks, vec!["ok", "éé", "éé", "é"]);
    }

    #[test]
    fn empty_lines_survive() {
        let blocks = paginate(["a", "", "b"], 100);
        assert_eq!(blocks, vec!["a\n\nb".to_string()]);
    }

    #[test]
    fn nothing_in_nothing_out() {
        assert!(paginate(Vec::<String>::new(), 10).is_empty());
    }
}
