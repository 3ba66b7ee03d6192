use std::fmt;

/// Result of decoding one run of marks.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Decoded {
    Char(char),
    /// The international error prosign, eight dits.
    Error,
    /// Anything not in the table, including the empty run.
    Unknown,
}

impl fmt::Display for Decoded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decoded::Char(c) => write!(f, "{c}"),
            Decoded::Error => f.write_str("<err>"),
            Decoded::Unknown => f.write_str("?"),
        }
    }
}

/// Decode one letter from a run of marks (`.` dit, `_` dah).
///
/// Total over all inputs: unmatched sequences and the empty run come back as
/// [`Decoded::Unknown`], never a panic.
pub(crate) fn decode_letter(marks: &str) -> Decoded {
    let c = match marks {
        "._" => 'A',
        "_..." => 'B',
        "_._." => 'C',
        "_.." => 'D',
        "." => 'E',
        ".._." => 'F',
        "__." => 'G',
        "...." => 'H',
        ".." => 'I',
        ".___" => 'J',
        "_._" => 'K',
        "._.." => 'L',
        "__" => 'M',
        "_." => 'N',
        "___" => 'O',
        ".__." => 'P',
        "__._" => 'Q',
        "._." => 'R',
        "..." => 'S',
        "_" => 'T',
        ".._" => 'U',
        "..._" => 'V',
        ".__" => 'W',
        "_.._" => 'X',
        "_.__" => 'Y',
        "__.." => 'Z',
        "_____" => '0',
        ".____" => '1',
        "..___" => '2',
        "...__" => '3',
        "...._" => '4',
        "....." => '5',
        "_...." => '6',
        "__..." => '7',
        "___.." => '8',
        "____." => '9',
        "........" => return Decoded::Error,
        _ => return Decoded::Unknown,
    };
    Decoded::Char(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters() {
        assert_eq!(decode_letter(".."), Decoded::Char('I'));
        assert_eq!(decode_letter("_..."), Decoded::Char('B'));
        assert_eq!(decode_letter("."), Decoded::Char('E'));
        assert_eq!(decode_letter("_"), Decoded::Char('T'));
        assert_eq!(decode_letter("__.."), Decoded::Char('Z'));
    }

    #[test]
    fn test_digits() {
        assert_eq!(decode_letter("_____"), Decoded::Char('0'));
        assert_eq!(decode_letter(".____"), Decoded::Char('1'));
        assert_eq!(decode_letter("____."), Decoded::Char('9'));
    }

    #[test]
    fn test_full_alphabet_is_covered() {
        let table = [
            "._", "_...", "_._.", "_..", ".", ".._.", "__.", "....", "..", ".___", "_._", "._..",
            "__", "_.", "___", ".__.", "__._", "._.", "...", "_", ".._", "..._", ".__", "_.._",
            "_.__", "__..",
        ];
        for (i, marks) in table.iter().enumerate() {
            let expected = char::from(b'A' + i as u8);
            assert_eq!(decode_letter(marks), Decoded::Char(expected), "{marks}");
        }
    }

    #[test]
    fn test_eight_dits_is_error_not_unknown() {
        assert_eq!(decode_letter("........"), Decoded::Error);
    }

    #[test]
    fn test_unmatched_is_unknown() {
        assert_eq!(decode_letter("______"), Decoded::Unknown);
        assert_eq!(decode_letter("._._._._."), Decoded::Unknown);
    }

    #[test]
    fn test_empty_is_unknown() {
        assert_eq!(decode_letter(""), Decoded::Unknown);
    }

    #[test]
    fn test_garbage_input_never_panics() {
        for marks in ["x", ".-", "dit", "…", &".".repeat(64)] {
            let _ = decode_letter(marks);
        }
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(decode_letter("_._"), decode_letter("_._"));
    }

    #[test]
    fn test_display() {
        assert_eq!(Decoded::Char('A').to_string(), "A");
        assert_eq!(Decoded::Error.to_string(), "<err>");
        assert_eq!(Decoded::Unknown.to_string(), "?");
    }
}
