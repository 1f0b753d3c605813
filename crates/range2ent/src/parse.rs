// SPDX-FileCopyrightText: 2025 xfnw
//
// SPDX-License-Identifier: MIT

use lazy_regex::regex_is_match;
use std::net::Ipv4Addr;

use crate::Error;

/// parse a range bound given as a number or an ipv4 address
///
/// numbers are decimal, or hexadecimal with a `0x` prefix. addresses are
/// turned into the integer their octets spell out.
pub fn bound(inp: &str) -> Result<u32, Error> {
    let invalid = || Error::InvalidEncoding(inp.to_string());

    if regex_is_match!(r"^(0x|)[0-9A-Fa-f]+$", inp) {
        return if let Some(hex) = inp.strip_prefix("0x") {
            u32::from_str_radix(hex, 16)
        } else {
            inp.parse()
        }
        .map_err(|_| invalid());
    }

    inp.parse::<Ipv4Addr>()
        .map(u32::from)
        .map_err(|_| invalid())
}

#[test]
fn numbers() {
    assert_eq!(bound("1234"), Ok(1234));
    assert_eq!(bound("0x1f"), Ok(0x1f));
    assert_eq!(bound("0xFFFFFFFF"), Ok(u32::MAX));
    assert_eq!(bound("0010"), Ok(10));
}

#[test]
fn addresses() {
    assert_eq!(bound("10.0.0.1"), Ok(0x0a00_0001));
    assert_eq!(bound("255.255.255.255"), Ok(u32::MAX));
}

#[test]
fn invalid() {
    for inp in ["", "ff", "0x", "-1", "4294967296", "0x100000000", "1.2.3", "fox"] {
        assert_eq!(bound(inp), Err(Error::InvalidEncoding(inp.to_string())), "{inp}");
    }
}
