//! Built-in general-purpose vocabulary backing the default lexicon.
//!
//! A compact selection of common English sentiment words on the VADER
//! valence scale (-4 = most negative, +4 = most positive). Keys are
//! lower-case.
//!
//! This is a subset of a few hundred words, not the full VADER vocabulary of
//! roughly 7,500 entries. Text whose sentiment words fall outside it scores
//! neutral here, so default-lexicon scores differ from full VADER on most
//! real comments.

pub(crate) const DEFAULT_VOCABULARY: &[(&str, f64)] = &[
    // positive
    ("love", 3.2),
    ("loved", 2.9),
    ("loves", 2.7),
    ("lovely", 2.8),
    ("loving", 2.9),
    ("like", 2.0),
    ("liked", 1.8),
    ("likes", 1.8),
    ("good", 1.9),
    ("great", 3.1),
    ("greatest", 3.2),
    ("best", 3.2),
    ("better", 1.9),
    ("nice", 1.8),
    ("fine", 0.8),
    ("ok", 1.2),
    ("okay", 0.9),
    ("cool", 1.3),
    ("awesome", 3.1),
    ("amazing", 2.8),
    ("excellent", 2.7),
    ("fantastic", 2.6),
    ("wonderful", 2.7),
    ("brilliant", 2.8),
    ("perfect", 2.7),
    ("beautiful", 2.9),
    ("happy", 2.7),
    ("happiness", 2.6),
    ("glad", 2.0),
    ("joy", 2.8),
    ("fun", 2.3),
    ("funny", 1.9),
    ("enjoy", 2.2),
    ("enjoyed", 2.3),
    ("exciting", 2.2),
    ("excited", 1.4),
    ("interesting", 1.7),
    ("thanks", 1.9),
    ("thank", 1.5),
    ("grateful", 2.0),
    ("appreciate", 1.7),
    ("helpful", 1.8),
    ("win", 2.8),
    ("wins", 2.7),
    ("winning", 2.4),
    ("won", 2.7),
    ("success", 2.7),
    ("successful", 2.8),
    ("agree", 1.5),
    ("support", 1.7),
    ("safe", 1.9),
    ("hope", 1.9),
    ("hopeful", 1.6),
    ("strong", 2.3),
    ("smart", 1.7),
    ("clever", 1.9),
    ("kind", 2.4),
    ("friendly", 2.2),
    ("friend", 2.2),
    ("friends", 2.1),
    ("proud", 2.1),
    ("win-win", 2.1),
    ("yes", 1.7),
    ("lol", 1.8),
    ("haha", 2.0),
    ("wow", 2.8),
    ("congrats", 2.4),
    ("congratulations", 2.9),
    ("recommend", 1.5),
    ("favorite", 2.0),
    ("favourite", 2.0),
    ("solid", 1.7),
    ("pretty", 2.2),
    ("sweet", 2.0),
    ("impressive", 2.3),
    ("incredible", 2.0),
    ("improve", 1.9),
    ("improved", 2.1),
    ("worth", 0.9),
    ("easy", 1.9),
    ("free", 2.3),
    ("peace", 2.5),
    ("calm", 1.3),
    ("relief", 2.1),
    ("trust", 2.3),
    ("honest", 2.3),
    ("fair", 1.3),
    ("beauty", 2.8),
    ("care", 2.2),
    ("celebrate", 2.7),
    ("comfortable", 2.3),
    ("confident", 2.2),
    ("cute", 2.0),
    ("dear", 1.6),
    ("delight", 2.9),
    ("eager", 1.5),
    ("fresh", 1.3),
    ("generous", 2.3),
    ("gorgeous", 3.0),
    ("laugh", 2.6),
    ("lucky", 2.3),
    ("masterpiece", 3.1),
    ("positive", 2.6),
    ("satisfied", 1.8),
    ("superb", 3.1),
    ("welcome", 2.0),
    // negative
    ("hate", -2.7),
    ("hated", -3.2),
    ("hates", -1.9),
    ("hating", -2.3),
    ("bad", -2.5),
    ("worse", -2.1),
    ("worst", -3.1),
    ("terrible", -2.1),
    ("horrible", -2.5),
    ("awful", -2.0),
    ("poor", -2.1),
    ("sad", -2.1),
    ("unhappy", -1.8),
    ("angry", -2.3),
    ("anger", -2.7),
    ("mad", -2.2),
    ("annoying", -1.7),
    ("annoyed", -1.6),
    ("boring", -1.3),
    ("bored", -1.1),
    ("stupid", -2.4),
    ("dumb", -2.3),
    ("idiot", -2.3),
    ("ugly", -2.3),
    ("disgusting", -2.4),
    ("fail", -2.5),
    ("failed", -2.3),
    ("failure", -2.3),
    ("lose", -1.7),
    ("lost", -1.3),
    ("loss", -1.3),
    ("losing", -1.6),
    ("wrong", -2.1),
    ("problem", -1.7),
    ("problems", -1.7),
    ("broken", -2.1),
    ("bug", -1.2),
    ("crash", -1.7),
    ("pain", -2.3),
    ("hurt", -2.4),
    ("sick", -2.3),
    ("kill", -3.7),
    ("killed", -3.5),
    ("dead", -3.3),
    ("die", -2.9),
    ("death", -2.9),
    ("war", -2.9),
    ("fear", -2.2),
    ("afraid", -2.0),
    ("scared", -1.9),
    ("worried", -1.2),
    ("worry", -1.9),
    ("sorry", -0.3),
    ("no", -1.2),
    ("disappointed", -1.9),
    ("disappointing", -2.2),
    ("problematic", -1.9),
    ("toxic", -2.3),
    ("trash", -1.5),
    ("garbage", -1.4),
    ("useless", -1.8),
    ("waste", -1.8),
    ("scam", -2.8),
    ("lie", -1.6),
    ("lies", -1.8),
    ("liar", -2.3),
    ("cheat", -2.2),
    ("unfair", -2.1),
    ("ridiculous", -1.5),
    ("pathetic", -2.3),
    ("crap", -1.6),
    ("damn", -1.7),
    ("shit", -2.6),
    ("fuck", -2.5),
    ("wtf", -2.8),
    ("ugh", -1.8),
    ("cry", -2.1),
    ("crying", -2.1),
    ("lonely", -1.5),
    ("miss", -0.6),
    ("nasty", -2.6),
    ("evil", -3.4),
    ("cruel", -2.8),
    ("danger", -2.4),
    ("dangerous", -2.1),
    ("weak", -1.9),
    ("mess", -1.5),
    ("rage", -2.6),
    ("ruin", -2.8),
    ("ruined", -2.4),
    ("hell", -3.6),
    ("sucks", -1.5),
    ("suck", -1.9),
    ("blame", -1.4),
    ("complain", -1.5),
    ("cancel", -1.0),
    ("expensive", -0.9),
    ("guilty", -1.8),
    ("hostile", -2.2),
    ("insult", -2.3),
    ("jealous", -2.0),
    ("negative", -2.7),
    ("offensive", -2.8),
    ("regret", -1.9),
    ("sadly", -2.1),
    ("shame", -2.1),
    ("threat", -2.4),
    ("tired", -1.9),
    ("unfortunately", -1.4),
    ("upset", -1.6),
];
