//! Character to key-stroke translation for a US keyboard layout

use rdev::Key;

/// A physical key plus whether Shift must be held to produce the character
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyPlan {
    pub key: Key,
    pub shift: bool,
}

impl KeyPlan {
    fn plain(key: Key) -> Self {
        Self { key, shift: false }
    }

    fn shifted(key: Key) -> Self {
        Self { key, shift: true }
    }
}

/// Map a printable ASCII character to the key that types it.
/// Returns `None` for anything the US layout cannot type directly.
pub fn key_for_char(c: char) -> Option<KeyPlan> {
    if c.is_ascii_alphabetic() {
        let key = letter_key(c.to_ascii_lowercase())?;
        return Some(KeyPlan {
            key,
            shift: c.is_ascii_uppercase(),
        });
    }

    let plan = match c {
        '0' => KeyPlan::plain(Key::Num0),
        '1' => KeyPlan::plain(Key::Num1),
        '2' => KeyPlan::plain(Key::Num2),
        '3' => KeyPlan::plain(Key::Num3),
        '4' => KeyPlan::plain(Key::Num4),
        '5' => KeyPlan::plain(Key::Num5),
        '6' => KeyPlan::plain(Key::Num6),
        '7' => KeyPlan::plain(Key::Num7),
        '8' => KeyPlan::plain(Key::Num8),
        '9' => KeyPlan::plain(Key::Num9),
        ')' => KeyPlan::shifted(Key::Num0),
        '!' => KeyPlan::shifted(Key::Num1),
        '@' => KeyPlan::shifted(Key::Num2),
        '#' => KeyPlan::shifted(Key::Num3),
        '$' => KeyPlan::shifted(Key::Num4),
        '%' => KeyPlan::shifted(Key::Num5),
        '^' => KeyPlan::shifted(Key::Num6),
        '&' => KeyPlan::shifted(Key::Num7),
        '*' => KeyPlan::shifted(Key::Num8),
        '(' => KeyPlan::shifted(Key::Num9),
        ' ' => KeyPlan::plain(Key::Space),
        '.' => KeyPlan::plain(Key::Dot),
        '>' => KeyPlan::shifted(Key::Dot),
        ',' => KeyPlan::plain(Key::Comma),
        '<' => KeyPlan::shifted(Key::Comma),
        '-' => KeyPlan::plain(Key::Minus),
        '_' => KeyPlan::shifted(Key::Minus),
        '=' => KeyPlan::plain(Key::Equal),
        '+' => KeyPlan::shifted(Key::Equal),
        '/' => KeyPlan::plain(Key::Slash),
        '?' => KeyPlan::shifted(Key::Slash),
        ';' => KeyPlan::plain(Key::SemiColon),
        ':' => KeyPlan::shifted(Key::SemiColon),
        '\'' => KeyPlan::plain(Key::Quote),
        '"' => KeyPlan::shifted(Key::Quote),
        '[' => KeyPlan::plain(Key::LeftBracket),
        '{' => KeyPlan::shifted(Key::LeftBracket),
        ']' => KeyPlan::plain(Key::RightBracket),
        '}' => KeyPlan::shifted(Key::RightBracket),
        '\\' => KeyPlan::plain(Key::BackSlash),
        '|' => KeyPlan::shifted(Key::BackSlash),
        '`' => KeyPlan::plain(Key::BackQuote),
        '~' => KeyPlan::shifted(Key::BackQuote),
        '\n' => KeyPlan::plain(Key::Return),
        '\t' => KeyPlan::plain(Key::Tab),
        _ => return None,
    };
    Some(plan)
}

fn letter_key(c: char) -> Option<Key> {
    let key = match c {
        'a' => Key::KeyA,
        'b' => Key::KeyB,
        'c' => Key::KeyC,
        'd' => Key::KeyD,
        'e' => Key::KeyE,
        'f' => Key::KeyF,
        'g' => Key::KeyG,
        'h' => Key::KeyH,
        'i' => Key::KeyI,
        'j' => Key::KeyJ,
        'k' => Key::KeyK,
        'l' => Key::KeyL,
        'm' => Key::KeyM,
        'n' => Key::KeyN,
        'o' => Key::KeyO,
        'p' => Key::KeyP,
        'q' => Key::KeyQ,
        'r' => Key::KeyR,
        's' => Key::KeyS,
        't' => Key::KeyT,
        'u' => Key::KeyU,
        'v' => Key::KeyV,
        'w' => Key::KeyW,
        'x' => Key::KeyX,
        'y' => Key::KeyY,
        'z' => Key::KeyZ,
        _ => return None,
    };
    Some(key)
}
