//! Normalising the indentation of blocks of code

/// Split text into lines and remove the indentation common to every line
/// that has content. Tabs count as a single space. Trailing whitespace is
/// dropped from every line, which also takes care of stray `\r`.
pub fn unindent(code: &str) -> Vec<String> {
    let lines: Vec<String> = code
        .split('\n')
        .map(|line| line.replace('\t', " "))
        .collect();

    let indent = lines
        .iter()
        .filter(|line| {
            !line
                .trim()
                .is_empty()
        })
        .map(|line| {
            line.bytes()
                .take_while(|&b| b == b' ')
                .count()
        })
        .min()
        .unwrap_or(0);

    lines
        .into_iter()
        .map(|line| {
            if line.len() > indent {
                line[indent..]
                    .trim_end()
                    .to_string()
            } else {
                line.trim_end()
                    .to_string()
            }
        })
        .collect()
}

/// Remove blank lines from the start and end of a block.
pub fn trim_blank_lines(mut lines: Vec<String>) -> Vec<String> {
    while lines
        .last()
        .is_some_and(|line| line.is_empty())
    {
        lines.pop();
    }

    let leading = lines
        .iter()
        .take_while(|line| line.is_empty())
        .count();
    lines.drain(..leading);

    lines
}
