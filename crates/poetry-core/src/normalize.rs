//! Cleaning rules for poem titles and line content.
//!
//! Both functions are pure. Stored data was cleaned with exactly these rules,
//! so the order of the steps and every character class must stay as they are;
//! otherwise a backfill pass would rewrite rows that are already clean.

use std::sync::LazyLock;

use regex::Regex;

static NUMBER_PREFIX: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^\d+\.\s*").expect("number prefix regex"));

static TRAILING_PARENTHETICAL: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"\s*\([^()]*\)\s*$").expect("trailing parenthetical regex")
});

static TRAILING_DASH: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"\s*-\s*$").expect("trailing dash regex"));

static TRAILING_PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| {
  Regex::new(r"[^a-zA-Z0-9\s“‘”’]+$").expect("trailing punctuation regex")
});

/// Characters that separate words in a title: Unicode whitespace plus the
/// ASCII information separators `\x1c`..=`\x1f`.
fn is_separator(c: char) -> bool { c.is_whitespace() || ('\x1c'..='\x1f').contains(&c) }

/// Clean a poem title.
///
/// In order:
/// 1. collapse runs of whitespace and `\x1c`..=`\x1f` to a single space and
///    trim the ends;
/// 2. drop every `"`;
/// 3. drop a leading `<digits>.` numbering prefix;
/// 4. trim leading and trailing `"` / `'`;
/// 5. set aside a trailing `(...)` group;
/// 6. drop a trailing ` - `;
/// 7. drop trailing characters other than ASCII alphanumerics, whitespace and
///    curly quotes;
/// 8. re-append the parenthetical after one space.
///
/// The result may be empty.
pub fn clean_title(raw: &str) -> String {
  let title = raw
    .split(is_separator)
    .filter(|word| !word.is_empty())
    .collect::<Vec<_>>()
    .join(" ");
  let title = title.replace('"', "");
  let title = NUMBER_PREFIX.replace(&title, "");
  let mut title = title.trim_matches(['"', '\'']).to_owned();

  let mut ending = None;
  if let Some(m) = TRAILING_PARENTHETICAL.find(&title) {
    ending = Some(m.as_str().trim().to_owned());
    title = title[..m.start()].trim().to_owned();
  }

  let title = TRAILING_DASH.replace(&title, "");
  let mut title = TRAILING_PUNCTUATION.replace(&title, "").into_owned();

  if let Some(ending) = ending.filter(|e| !e.is_empty()) {
    title.push(' ');
    title.push_str(&ending);
  }
  title
}

/// Clean one line of a poem.
///
/// Drops every `"`, then trims every leading and trailing character that is
/// not an ASCII letter or digit (whitespace included). An empty result means
/// the line carries no text and should be discarded.
pub fn clean_line(raw: &str) -> String {
  raw
    .replace('"', "")
    .trim_matches(|c: char| !c.is_ascii_alphanumeric())
    .to_owned()
}

#[cfg(test)]
mod tests {
  use super::*;

  // ─── Titles ────────────────────────────────────────────────────────────────

  #[test]
  fn title_numbering_quotes_and_parenthetical() {
    assert_eq!(clean_title("1. \"The Raven\"  (a poem)"), "The Raven (a poem)");
  }

  #[test]
  fn title_trailing_dash() {
    assert_eq!(clean_title("Ozymandias -"), "Ozymandias");
  }

  #[test]
  fn title_dash_before_parenthetical() {
    assert_eq!(clean_title("Title - (1850)"), "Title (1850)");
  }

  #[test]
  fn title_collapses_whitespace_and_trailing_punctuation() {
    assert_eq!(clean_title("  Sonnet \t 18:  "), "Sonnet 18");
    assert_eq!(clean_title("The Tyger..."), "The Tyger");
  }

  #[test]
  fn title_treats_information_separators_as_whitespace() {
    assert_eq!(clean_title("A\x1fB"), "A B");
    assert_eq!(clean_title("\x1cThe Raven \x1d\u{3000} (1845)\x1e"), "The Raven (1845)");
  }

  #[test]
  fn title_strips_straight_quotes_but_keeps_curly_ones() {
    assert_eq!(clean_title("'Tis the Season!"), "Tis the Season");
    assert_eq!(
      clean_title("“Hope” is the thing with feathers -"),
      "“Hope” is the thing with feathers"
    );
  }

  #[test]
  fn title_only_leading_numbering_is_removed() {
    assert_eq!(clean_title("12. Song"), "Song");
    assert_eq!(clean_title("Song 12. Again"), "Song 12. Again");
  }

  #[test]
  fn title_punctuation_after_parenthetical_eats_the_closing_paren() {
    // The parenthetical rule only fires when `)` is last, so the trailing
    // punctuation rule sees `).` as one run. Stored titles carry this shape.
    assert_eq!(
      clean_title("A Dream Within a Dream (1849)."),
      "A Dream Within a Dream (1849"
    );
  }

  #[test]
  fn title_empty_input() {
    assert_eq!(clean_title(""), "");
    assert_eq!(clean_title("  \"\"  "), "");
  }

  #[test]
  fn title_cleaning_is_idempotent() {
    let samples = [
      "1. \"The Raven\"  (a poem)",
      "Ozymandias -",
      "Title - (1850)",
      "  Sonnet \t 18:  ",
      "“Hope” is the thing with feathers -",
      "A Dream Within a Dream (1849).",
      "Lines Written in Early Spring",
      "...",
    ];
    for raw in samples {
      let once = clean_title(raw);
      assert_eq!(clean_title(&once), once, "input: {raw:?}");
    }
  }

  #[test]
  fn title_with_space_before_trailing_punctuation_settles_on_second_pass() {
    let once = clean_title("x (y) !");
    assert_eq!(once, "x (y) ");
    assert_eq!(clean_title(&once), "x (y)");
  }

  // ─── Lines ─────────────────────────────────────────────────────────────────

  #[test]
  fn line_quotes_whitespace_and_punctuation() {
    assert_eq!(
      clean_line("  \"Once upon a midnight dreary,\"  "),
      "Once upon a midnight dreary"
    );
  }

  #[test]
  fn line_of_only_punctuation_becomes_empty() {
    assert_eq!(clean_line("..."), "");
    assert_eq!(clean_line("  -- "), "");
    assert_eq!(clean_line(""), "");
  }

  #[test]
  fn line_keeps_inner_punctuation() {
    assert_eq!(clean_line("  And, lo! "), "And, lo");
    assert_eq!(clean_line("“Tis but a dream’"), "Tis but a dream");
  }

  #[test]
  fn line_non_ascii_letters_at_edges_are_stripped() {
    assert_eq!(clean_line("élan vital é"), "lan vital");
  }

  #[test]
  fn line_cleaning_is_idempotent() {
    let samples = [
      "  \"Once upon a midnight dreary,\"  ",
      "...",
      "  And, lo! ",
      "“Tis but a dream’",
      "plain line",
    ];
    for raw in samples {
      let once = clean_line(raw);
      assert_eq!(clean_line(&once), once, "input: {raw:?}");
    }
  }
}
