use std::str::FromStr;

use crate::*;



/// Parses a textual combo like "Shift+Ctrl+Alt+Win+3" or "Ctrl+F5". <br>
/// Tokens are split on '+', trimmed, and matched case-insensitively. Modifier tokens (Ctrl/Control, Alt, Shift, Win/Meta)
/// can repeat freely, but there must be exactly one non-modifier token : a single letter/digit, or F1..F24.
pub fn parse_combination (text:&str) -> Result<ParsedCombination, ComboParseError> {

    let tokens: Vec<&str> = text .split('+') .map (str::trim) .filter (|t| !t.is_empty()) .collect();
    if tokens.is_empty() { return Err (ComboParseError::Empty) }

    let mut mods = ModSet::empty();
    let mut key: Option<(VKey, &str)> = None;

    for tok in tokens {
        if let Ok(mk) = ModKey::from_str(tok) {
            mods.insert(mk);
            continue
        }
        let vk = parse_key_token(tok) .ok_or_else (|| ComboParseError::UnknownToken (tok.to_string()))?;
        if let Some((_, first)) = key {
            return Err ( ComboParseError::SecondKey { first: first.to_string(), second: tok.to_string() } )
        }
        key = Some((vk, tok));
    }

    key .map (|(key,_)| ParsedCombination { mods, key }) .ok_or (ComboParseError::NoKey)
}


fn parse_key_token (tok:&str) -> Option<VKey> {
    let mut chars = tok.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return VKey::from_char(c)
    }
    // F-keys .. "F" followed by 1..24
    let num = tok .strip_prefix('F') .or_else (|| tok.strip_prefix('f'))?;
    if !num.chars().all(|c| c.is_ascii_digit()) { return None }
    num .parse::<u8>() .ok() .and_then (VKey::function_key)
}


impl FromStr for ParsedCombination {
    type Err = ComboParseError;
    fn from_str (s:&str) -> Result<Self, Self::Err> { parse_combination(s) }
}




#[cfg(test)]
mod tests {
    use super::*;
    use ModKey::*;

    #[test]
    fn parses_modifiers_and_digit() {
        let pc = parse_combination("Ctrl+Alt+Win+3").unwrap();
        assert_eq!(pc.mods, ModSet::of(&[Ctrl, Alt, Win]));
        assert_eq!(pc.key, VKey(b'3' as u16));
    }

    #[test]
    fn parses_function_key() {
        let pc = parse_combination("Shift+F5").unwrap();
        assert_eq!(pc.mods, ModSet::of(&[Shift]));
        assert_eq!(pc.key, VKey::function_key(5).unwrap());
        assert_eq!(parse_combination("f24").unwrap().key, VKey::F24);
    }

    #[test]
    fn tokens_are_trimmed_and_case_insensitive() {
        let pc = parse_combination("  control + META +  shift+a ").unwrap();
        assert_eq!(pc.mods, ModSet::of(&[Ctrl, Win, Shift]));
        assert_eq!(pc.key, VKey(b'A' as u16));
    }

    #[test]
    fn repeated_modifiers_are_idempotent() {
        let a = parse_combination("Ctrl+Ctrl+Control+Q").unwrap();
        let b = parse_combination("Ctrl+Q").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn a_lone_key_is_allowed() {
        let pc = parse_combination("F").unwrap();
        assert!(pc.mods.is_empty());
        assert_eq!(pc.key, VKey(b'F' as u16));
    }

    #[test]
    fn modifiers_without_key_fail() {
        assert_eq!(parse_combination("Ctrl+Alt"), Err(ComboParseError::NoKey));
    }

    #[test]
    fn two_keys_fail() {
        assert!(matches!(parse_combination("A+B"), Err(ComboParseError::SecondKey { .. })));
    }

    #[test]
    fn unknown_and_empty_fail() {
        assert_eq!(parse_combination(""), Err(ComboParseError::Empty));
        assert_eq!(parse_combination(" + "), Err(ComboParseError::Empty));
        assert!(matches!(parse_combination("Ctrl+Tab"), Err(ComboParseError::UnknownToken(_))));
        assert!(matches!(parse_combination("Ctrl+F25"), Err(ComboParseError::UnknownToken(_))));
        assert!(matches!(parse_combination("Ctrl+F0"), Err(ComboParseError::UnknownToken(_))));
        assert!(matches!(parse_combination("Ctrl+-"), Err(ComboParseError::UnknownToken(_))));
    }

    #[test]
    fn native_modifiers_always_carry_no_repeat() {
        let pc: ParsedCombination = "Alt+1".parse().unwrap();
        assert_eq!(pc.native_modifiers(), 0x01 | MOD_NOREPEAT_FLAG);
        assert_eq!(pc.to_string(), "Alt+1");
    }
}
