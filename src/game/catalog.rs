//! Static table of known strategems.

use rand::Rng;
use rand::seq::SliceRandom;

/// A single directional key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Parse a WASD key.
    pub fn from_key(key: char) -> Option<Self> {
        match key {
            'w' => Some(Self::Up),
            's' => Some(Self::Down),
            'a' => Some(Self::Left),
            'd' => Some(Self::Right),
            _ => None,
        }
    }

    pub fn key(self) -> char {
        match self {
            Self::Up => 'w',
            Self::Down => 's',
            Self::Left => 'a',
            Self::Right => 'd',
        }
    }

    /// Vim-style alternate key.
    pub fn alt_key(self) -> char {
        match self {
            Self::Up => 'k',
            Self::Down => 'j',
            Self::Left => 'h',
            Self::Right => 'l',
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Up => "⬆️",
            Self::Down => "⬇️",
            Self::Left => "⬅️",
            Self::Right => "➡️",
        }
    }
}

/// A named input sequence the player has to reproduce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Strategem {
    pub name: &'static str,
    /// Expected input over the `w`/`a`/`s`/`d` alphabet.
    pub input: &'static str,
}

impl Strategem {
    pub const fn new(name: &'static str, input: &'static str) -> Self {
        Self { name, input }
    }

    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.input.chars().filter_map(Direction::from_key)
    }

    /// Arrow icons separated by spaces.
    pub fn icons(&self) -> String {
        self.directions()
            .map(Direction::icon)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The same input typed on the HJKL layout.
    pub fn hjkl(&self) -> String {
        self.directions().map(Direction::alt_key).collect()
    }

    /// Number of keys in the sequence.
    pub fn len(&self) -> usize {
        self.input.len()
    }

    pub fn is_empty(&self) -> bool {
        self.input.is_empty()
    }
}

pub static STRATEGEMS: &[Strategem] = &[
    // Support
    Strategem::new("Resupply", "sswd"),
    Strategem::new("Reinforce", "wsdaw"),
    Strategem::new("NUX-223 Hellbomb", "swaswdsw"),
    // Backpacks
    Strategem::new("AX/LAS-5 'Guard Dog' Rover", "swawdd"),
    Strategem::new("AD-334 Guard Dog", "swawds"),
    Strategem::new("LIFT-850 Jump Pack", "swwsw"),
    Strategem::new("B-1 Supply Pack", "swssd"),
    Strategem::new("SH-32 Shield Generator Pack", "swadad"),
    Strategem::new("SH-20 Ballistic Shield Backpack", "sasswa"),
    // Support weapons
    Strategem::new("AC-8 Autocannon", "saswwd"),
    Strategem::new("EAT-17 Expendable Anti-Tank", "sadws"),
    Strategem::new("FLAM-40 'Incinerator' Flamethrower", "sasda"),
    Strategem::new("LAS-98 Laser Cannon", "saswa"),
    Strategem::new("M-105 Stalwart", "saswwa"),
    Strategem::new("MG-43 Machine Gun", "saswd"),
    Strategem::new("ARC-3 Arc Thrower", "sdswaa"),
    Strategem::new("GL-21 Grenade Launcher", "sawas"),
    Strategem::new("APW-1 Anti-Materiel Rifle", "sadws"),
    Strategem::new("RS-422 Railgun", "sdswad"),
    Strategem::new("GR-8 Recoilless Rifle", "sadda"),
    Strategem::new("FAF-14 Spear", "saswwd"),
    // Vehicles
    Strategem::new("EXO-45 Patriot Exosuit", "asdwass"),
];

/// Draw `count` strategems uniformly, with replacement.
pub fn choose_random<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<&'static Strategem> {
    (0..count).filter_map(|_| STRATEGEMS.choose(rng)).collect()
}

/// Draw a single strategem.
pub fn choose_one<R: Rng + ?Sized>(rng: &mut R) -> &'static Strategem {
    // The table is a non-empty static.
    &STRATEGEMS[rng.gen_range(0..STRATEGEMS.len())]
}
