//! Fixed candidate name lists for pseudonym generation.
//!
//! Order is load-bearing: the seeded draws index into these slices, so any
//! reordering or resizing changes every generated identity. A handful of
//! entries repeat; the duplicates are part of the established distribution
//! and are kept so existing anonymized datasets stay reproducible.

/// Candidate first names, indexed by the first seeded draw.
pub const FIRST_NAMES: [&str; 100] = [
    "Alex", "Taylor", "Jordan", "Casey", "Riley", "Quinn", "Morgan", "Avery", "Reese", "Jamie",
    "Rowan", "Parker", "Drew", "Shawn", "Emerson", "Hayden", "Skyler", "Finley", "Sage", "Kendall",
    "Cameron", "Logan", "Blake", "Harper", "Elliot", "Dana", "Micah", "Charlie", "Dakota", "Peyton",
    "Jude", "Remy", "Rory", "Eden", "Adrian", "Alexis", "Bailey", "Brett", "Campbell", "Chandler",
    "Corey", "Darian", "Devon", "Emery", "Frankie", "Hollis", "Jesse", "Jules", "Kai", "Kasey",
    "Kris", "Lane", "Lennon", "Linden", "Luca", "Marley", "Monroe", "Noel", "Oakley", "Phoenix",
    "Reagan", "River", "Rylan", "Sasha", "Shiloh", "Sidney", "Spencer", "Stevie", "Teagan", "Toby",
    "Tristan", "Val", "Wren", "Arden", "Bellamy", "Blaine", "Brighton", "Cody", "Dallas", "Ellis",
    "Gray", "Indy", "Jaden", "Keegan", "Kendrick", "Laken", "Leighton", "Lex", "Merritt", "Murphy",
    "Nico", "Parker", "Quincy", "Reign", "Sutton", "Tanner", "Tyler", "Vaughn", "Willow", "Zephyr",
];

/// Candidate last names, indexed by the second seeded draw.
pub const LAST_NAMES: [&str; 100] = [
    "Hill", "Brooks", "Reed", "Parker", "Gray", "Mason", "Price", "Wells", "Cooper", "Hayes",
    "Bennett", "Collins", "Foster", "Greer", "Jensen", "Kennedy", "Monroe", "Palmer", "Sawyer",
    "Wade", "Adams", "Baker", "Barnes", "Bell", "Bishop", "Boone", "Bowen", "Brady", "Bryant",
    "Carson", "Chambers", "Clarke", "Clayton", "Cole", "Collins", "Cruz", "Dalton", "Dawson",
    "Dean", "Dixon", "Douglas", "Doyle", "Drake", "Dunn", "Eaton", "Ellis", "Farrell", "Fischer",
    "Fleming", "Ford", "Fowler", "Franklin", "Garner", "Gibbs", "Glover", "Grady", "Grant",
    "Griffin", "Hale", "Hardy", "Harmon", "Harper", "Harris", "Hart", "Hendrix", "Holt", "Hopkins",
    "Hudson", "Hughes", "Hunter", "Ingram", "Jarvis", "Keller", "Lane", "Lawson", "Logan", "Lowe",
    "Manning", "Marshall", "Massey", "Matthews", "Maxwell", "McCoy", "Meyer", "Mills", "Moody",
    "Nash", "Newman", "Norton", "Page", "Payne", "Pierce", "Poole", "Porter", "Pratt", "Quinn",
    "Ramsey", "Reeves", "Rhodes", "Roy",
];
