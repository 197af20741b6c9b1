//! Arabic contextual shaping into presentation forms (U+FB50..U+FEFF).
//!
//! Each letter is replaced by its isolated, final, initial or medial form
//! depending on whether its neighbours join to it. Lam followed by an alef
//! collapses into a single ligature. Harakat and Quranic marks are dropped;
//! they never break a join between the letters around them.

/// Presentation forms of one letter: isolated, final, initial, medial.
/// Right-joining letters have no initial or medial form.
#[derive(Clone, Copy)]
struct Forms {
    isolated: char,
    fin: char,
    initial: Option<char>,
    medial: Option<char>,
}

const fn dual(base: u32) -> Forms {
    Forms {
        isolated: ch(base),
        fin: ch(base + 1),
        initial: Some(ch(base + 2)),
        medial: Some(ch(base + 3)),
    }
}

const fn right(base: u32) -> Forms {
    Forms { isolated: ch(base), fin: ch(base + 1), initial: None, medial: None }
}

const fn ch(cp: u32) -> char {
    match char::from_u32(cp) {
        Some(c) => c,
        None => '\u{FFFD}',
    }
}

const TATWEEL: char = '\u{0640}';
const LAM: char = '\u{0644}';

fn forms(c: char) -> Option<Forms> {
    let f = match c {
        '\u{0621}' => Forms { isolated: '\u{FE80}', fin: '\u{FE80}', initial: None, medial: None },
        '\u{0622}' => right(0xFE81),
        '\u{0623}' => right(0xFE83),
        '\u{0624}' => right(0xFE85),
        '\u{0625}' => right(0xFE87),
        '\u{0626}' => dual(0xFE89),
        '\u{0627}' => right(0xFE8D),
        '\u{0628}' => dual(0xFE8F),
        '\u{0629}' => right(0xFE93),
        '\u{062A}' => dual(0xFE95),
        '\u{062B}' => dual(0xFE99),
        '\u{062C}' => dual(0xFE9D),
        '\u{062D}' => dual(0xFEA1),
        '\u{062E}' => dual(0xFEA5),
        '\u{062F}' => right(0xFEA9),
        '\u{0630}' => right(0xFEAB),
        '\u{0631}' => right(0xFEAD),
        '\u{0632}' => right(0xFEAF),
        '\u{0633}' => dual(0xFEB1),
        '\u{0634}' => dual(0xFEB5),
        '\u{0635}' => dual(0xFEB9),
        '\u{0636}' => dual(0xFEBD),
        '\u{0637}' => dual(0xFEC1),
        '\u{0638}' => dual(0xFEC5),
        '\u{0639}' => dual(0xFEC9),
        '\u{063A}' => dual(0xFECD),
        '\u{0641}' => dual(0xFED1),
        '\u{0642}' => dual(0xFED5),
        '\u{0643}' => dual(0xFED9),
        '\u{0644}' => dual(0xFEDD),
        '\u{0645}' => dual(0xFEE1),
        '\u{0646}' => dual(0xFEE5),
        '\u{0647}' => dual(0xFEE9),
        '\u{0648}' => right(0xFEED),
        '\u{0649}' => right(0xFEEF),
        '\u{064A}' => dual(0xFEF1),
        // Presentation Forms-A: alef wasla and the Persian/Urdu letters
        '\u{0671}' => right(0xFB50),
        '\u{067E}' => dual(0xFB56),
        '\u{0686}' => dual(0xFB7A),
        '\u{0698}' => right(0xFB8A),
        '\u{06A9}' => dual(0xFB8E),
        '\u{06AF}' => dual(0xFB92),
        '\u{06CC}' => dual(0xFBFC),
        _ => return None,
    };
    Some(f)
}

/// Lam-alef ligature (isolated, final) for the alef following a lam.
fn lam_alef(alef: char) -> Option<(char, char)> {
    match alef {
        '\u{0622}' => Some(('\u{FEF5}', '\u{FEF6}')),
        '\u{0623}' => Some(('\u{FEF7}', '\u{FEF8}')),
        '\u{0625}' => Some(('\u{FEF9}', '\u{FEFA}')),
        '\u{0627}' => Some(('\u{FEFB}', '\u{FEFC}')),
        _ => None,
    }
}

/// Harakat, Quranic annotation marks and other combining marks.
pub fn is_transparent(c: char) -> bool {
    matches!(c,
        '\u{0610}'..='\u{061A}' |
        '\u{064B}'..='\u{065F}' |
        '\u{0670}' |
        '\u{06D6}'..='\u{06DC}' |
        '\u{06DF}'..='\u{06E8}' |
        '\u{06EA}'..='\u{06ED}' |
        '\u{08D4}'..='\u{08E1}' |
        '\u{08E3}'..='\u{08FF}'
    )
}

fn joins_left(c: char) -> bool {
    c == TATWEEL || forms(c).is_some_and(|f| f.initial.is_some())
}

fn joins_right(c: char) -> bool {
    c == TATWEEL || forms(c).is_some_and(|f| f.fin != f.isolated)
}

/// Shape `text` in logical order, returning presentation-form characters
/// with all transparent marks removed.
pub fn reshape(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if is_transparent(c) {
            i += 1;
            continue;
        }
        let Some(f) = forms(c) else {
            out.push(c);
            i += 1;
            continue;
        };

        let prev = neighbour(&chars, i, Direction::Back);
        let joined_before = prev.is_some_and(joins_left);

        // Lam + alef, possibly with marks between them, becomes one ligature
        if c == LAM {
            if let Some((j, alef)) = next_letter(&chars, i) {
                if let Some((iso, fin)) = lam_alef(alef) {
                    out.push(if joined_before { fin } else { iso });
                    i = j + 1;
                    continue;
                }
            }
        }

        let joined_after = f.initial.is_some()
            && neighbour(&chars, i, Direction::Forward).is_some_and(joins_right);

        let shaped = match (joined_before, joined_after) {
            (true, true) => f.medial.unwrap_or(f.fin),
            (true, false) => f.fin,
            (false, true) => f.initial.unwrap_or(f.isolated),
            (false, false) => f.isolated,
        };
        out.push(shaped);
        i += 1;
    }
    out
}

enum Direction {
    Back,
    Forward,
}

/// Nearest non-transparent character before or after `i`.
fn neighbour(chars: &[char], i: usize, dir: Direction) -> Option<char> {
    match dir {
        Direction::Back => chars[..i].iter().rev().copied().find(|&c| !is_transparent(c)),
        Direction::Forward => chars[i + 1..].iter().copied().find(|&c| !is_transparent(c)),
    }
}

fn next_letter(chars: &[char], i: usize) -> Option<(usize, char)> {
    chars
        .iter()
        .enumerate()
        .skip(i + 1)
        .find(|&(_, &c)| !is_transparent(c))
        .map(|(j, &c)| (j, c))
}
