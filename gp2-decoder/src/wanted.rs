//! Wanted MID list
//!
//! Builds the allow-list of OSP message identifiers from the `--wmsg`
//! configuration string and answers membership queries for the MID filter.
//!
//! Recognized forms:
//! - `ALL`: every MID is wanted
//! - `RINEX`: the MIDs needed for RINEX generation ([`RINEX_MIDS`])
//! - `RINEX,<list>`: the RINEX MIDs followed by `<list>`
//! - `<list>`: only the MIDs in `<list>`
//!
//! `<list>` is a sequence of decimal integers separated by any of `,;.:`.

use crate::types::{DecoderError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// MIDs needed to generate RINEX files from OSP data
pub const RINEX_MIDS: [u8; 12] = [2, 6, 7, 56, 8, 11, 12, 15, 28, 50, 64, 75];

/// Maximum number of MIDs in an explicit list
pub const MAX_WANTED_MIDS: usize = 99;

const LIST_DELIMITERS: &[char] = &[',', ';', '.', ':'];

/// Allow-list of message identifiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WantedMids {
    /// Every MID is wanted
    All,
    /// Only these MIDs are wanted (insertion order kept, never contains 0)
    List(Vec<u8>),
}

impl Default for WantedMids {
    fn default() -> Self {
        Self::rinex()
    }
}

impl WantedMids {
    /// The built-in RINEX list
    pub fn rinex() -> Self {
        WantedMids::List(RINEX_MIDS.to_vec())
    }

    /// Build the wanted list from a configuration string
    ///
    /// Tokens are read like C `atoi`: leading digits are used and a token
    /// without leading digits reads as 0. A 0 ends the list, so any tokens
    /// after a non-numeric one are dropped (`"6,x,7"` gives `[6]`). Values
    /// that do not fit a MID byte are skipped, and once the list holds
    /// [`MAX_WANTED_MIDS`] entries further values are refused. An explicit
    /// list left with no MID at all (`"0,51"`, `"x"`) wants every MID, as
    /// `ALL` does. Each of these cases is logged as a warning.
    pub fn parse(text: &str) -> Self {
        let (mut wanted, list) = match Self::split_prefix(text) {
            Prefix::All => return WantedMids::All,
            Prefix::Rinex(list) => (RINEX_MIDS.to_vec(), list),
            Prefix::Custom(list) => (Vec::new(), list),
        };

        for token in Self::tokens(list) {
            let value = leading_int(token);
            if value == 0 {
                log::warn!(
                    "Wanted MID token {:?} reads as 0, ignoring it and the rest of the list",
                    token
                );
                break;
            }
            let Ok(mid) = u8::try_from(value) else {
                log::warn!("Wanted MID {} is not a valid MID, skipped", value);
                continue;
            };
            if wanted.len() >= MAX_WANTED_MIDS {
                log::warn!(
                    "{}",
                    DecoderError::WantedListFull {
                        capacity: MAX_WANTED_MIDS,
                        mid
                    }
                );
                break;
            }
            wanted.push(mid);
        }

        if wanted.is_empty() {
            log::warn!("Wanted MID list {:?} has no MID, all messages will be extracted", text);
            return WantedMids::All;
        }
        WantedMids::List(wanted)
    }

    /// Build the wanted list, rejecting anything [`WantedMids::parse`] would
    /// silently truncate or skip
    pub fn parse_strict(text: &str) -> Result<Self> {
        let (mut wanted, list) = match Self::split_prefix(text) {
            Prefix::All => return Ok(WantedMids::All),
            Prefix::Rinex(list) => (RINEX_MIDS.to_vec(), list),
            Prefix::Custom(list) => (Vec::new(), list),
        };

        for token in Self::tokens(list) {
            let mid = match token.trim().parse::<u8>() {
                Ok(mid) if mid != 0 => mid,
                _ => return Err(DecoderError::InvalidMid(token.to_string())),
            };
            if wanted.len() >= MAX_WANTED_MIDS {
                return Err(DecoderError::WantedListFull {
                    capacity: MAX_WANTED_MIDS,
                    mid,
                });
            }
            wanted.push(mid);
        }

        if wanted.is_empty() {
            return Err(DecoderError::InvalidMid(text.to_string()));
        }
        Ok(WantedMids::List(wanted))
    }

    /// Append one MID to an explicit list
    ///
    /// Appending to [`WantedMids::All`] is a no-op since every MID is
    /// already wanted.
    pub fn try_insert(&mut self, mid: u8) -> Result<()> {
        match self {
            WantedMids::All => Ok(()),
            WantedMids::List(_) if mid == 0 => Err(DecoderError::InvalidMid(mid.to_string())),
            WantedMids::List(mids) if mids.len() >= MAX_WANTED_MIDS => {
                Err(DecoderError::WantedListFull {
                    capacity: MAX_WANTED_MIDS,
                    mid,
                })
            }
            WantedMids::List(mids) => {
                mids.push(mid);
                Ok(())
            }
        }
    }

    /// Check if a MID is wanted
    pub fn contains(&self, mid: u8) -> bool {
        match self {
            WantedMids::All => true,
            WantedMids::List(mids) => mids.contains(&mid),
        }
    }

    /// Check if every MID is wanted
    pub fn is_all(&self) -> bool {
        matches!(self, WantedMids::All)
    }

    fn split_prefix(text: &str) -> Prefix<'_> {
        if text == "ALL" {
            Prefix::All
        } else if text == "RINEX" {
            Prefix::Rinex("")
        } else if let Some(list) = text.strip_prefix("RINEX,") {
            Prefix::Rinex(list)
        } else {
            Prefix::Custom(text)
        }
    }

    fn tokens(list: &str) -> impl Iterator<Item = &str> {
        list.split(LIST_DELIMITERS).filter(|t| !t.is_empty())
    }
}

impl fmt::Display for WantedMids {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WantedMids::All => write!(f, "ALL"),
            WantedMids::List(mids) => {
                let rendered: Vec<String> = mids.iter().map(|m| m.to_string()).collect();
                write!(f, "{}", rendered.join(" "))
            }
        }
    }
}

enum Prefix<'a> {
    All,
    Rinex(&'a str),
    Custom(&'a str),
}

/// C `atoi`: optional leading whitespace and sign, then as many digits as
/// present; no digits reads as 0
fn leading_int(token: &str) -> i64 {
    let token = token.trim_start();
    let (negative, digits) = match token.as_bytes().first() {
        Some(b'-') => (true, &token[1..]),
        Some(b'+') => (false, &token[1..]),
        _ => (false, token),
    };
    let value = digits
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .fold(0i64, |acc, b| {
            acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
        });
    if negative {
        -value
    } else {
        value
    }
}
