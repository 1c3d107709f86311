/// Splits a file name into the part the pipeline edits and the suffix it leaves alone.
///
/// With `include_extension` the whole name is editable. Otherwise the extension
/// starts at the last dot; a leading dot (`.bashrc`) does not count as one.
pub fn split_filename(name: &str, include_extension: bool) -> (&str, &str) {
    if include_extension {
        return (name, "");
    }

    match name.rfind('.') {
        Some(0) | None => (name, ""),
        Some(idx) => name.split_at(idx),
    }
}

pub fn char_len(value: &str) -> usize {
    value.chars().count()
}

/// Byte offset of the `index`-th char, or the end of the string when out of range.
pub fn byte_offset(value: &str, index: usize) -> usize {
    value
        .char_indices()
        .nth(index)
        .map(|(offset, _)| offset)
        .unwrap_or(value.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_at_last_dot() {
        assert_eq!(split_filename("IMG0001.jpg", false), ("IMG0001", ".jpg"));
        assert_eq!(split_filename("archive.tar.gz", false), ("archive.tar", ".gz"));
        assert_eq!(split_filename("notes.md", false), ("notes", ".md"));
        assert_eq!(split_filename("photo.jpeg", false), ("photo", ".jpeg"));
    }

    #[test]
    fn keeps_dotfiles_and_bare_names_whole() {
        assert_eq!(split_filename(".bashrc", false), (".bashrc", ""));
        assert_eq!(split_filename("Makefile", false), ("Makefile", ""));
    }

    #[test]
    fn include_extension_keeps_full_name() {
        assert_eq!(split_filename("IMG0001.jpg", true), ("IMG0001.jpg", ""));
    }

    #[test]
    fn byte_offset_handles_multibyte() {
        let value = "写真01";
        assert_eq!(byte_offset(value, 0), 0);
        assert_eq!(byte_offset(value, 1), 3);
        assert_eq!(byte_offset(value, 4), value.len());
        assert_eq!(byte_offset(value, 10), value.len());
    }
}
