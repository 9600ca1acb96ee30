//! Fixed perk catalog

use rand::seq::SliceRandom;
use rand::Rng;

/// Number of perks offered at character creation
pub const DEFAULT_PERK_OFFER: usize = 6;

/// Every perk a character can be created with
pub const ALL_PERKS: &[&str] = &[
    "Genius Intellect",
    "Artistic Talent",
    "Athletic Prowess",
    "Charismatic Leader",
    "Financial Mogul",
    "Kind Heart",
    "Resilient Body",
    "Lucky Charm",
    "Inventive Mind",
    "Musical Prodigy",
    "Master Negotiator",
    "Photographic Memory",
    "Night Owl Focus",
    "Early Riser Energy",
    "Perpetual Optimism",
    "Skeptical Mind",
    "Silver Tongue",
    "Stone Cold Poker Face",
    "Pack Rat Tendencies",
    "Minimalist Lifestyle",
    "Master Chef Skills",
    "Gardening Green Thumb",
    "DIY Handyman",
    "Tech Savvy",
    "Analog Lover",
    "Boundless Curiosity",
    "Commitment Phobe",
    "Eternal Student",
    "Natural Therapist",
    "Cold-Blooded Calm",
    "Hot-Temper Burst",
    "Chronic Procrastination",
    "Deadline Crusher",
    "Serial Hobbyist",
    "Collector's Eye",
    "Travel Junkie",
    "Homebody Comfort",
    "Social Butterfly",
    "Introvert Recharge",
    "Photographer's Eye",
    "Slow and Steady",
    "Speed Demon",
    "Perceptive Observer",
    "Absent-Minded Professor",
    "Wallflower Charm",
    "Spotlight Seeker",
    "Coincidence Magnet",
    "Conspiracy Theorist",
    "Lucky Penny Finder",
    "Jinxed Luck",
    "Silver Lining Finder",
    "Perfectionist Tendencies",
    "Happy-Go-Lucky",
    "Blunt Honesty",
    "White Lie Expert",
    "Master of Small Talk",
    "Deep Conversationalist",
    "Emotionally Intuitive",
    "Emotionally Reserved",
    "Night Vision",
    "Daydream Weaver",
    "Memory Like a Sieve",
    "Eidetic Recall",
    "Street Smart",
    "Book Smart",
    "Natural Leader",
    "Reluctant Follower",
    "Team Player",
    "Lone Wolf",
    "Adaptive Chameleon",
    "Stubborn as Ox",
    "Flexible Thinker",
    "Risk Averse",
    "Gambler's Instinct",
    "Safety First",
    "Adrenaline Seeker",
    "Cautious Investor",
    "Impulsive Buyer",
    "Savvy Saver",
    "Generous Soul",
    "Miserly Ways",
    "Prankster Spirit",
    "Serious Stoic",
    "Optimized Routine",
    "Chaotic Energy",
    "Organizational Guru",
    "Creative Mess",
    "Multitasking Pro",
    "Monotasking Master",
    "Hyperfocused",
    "Easily Distracted",
    "Translator Tongue",
    "Monolingual Comfort",
    "Sense of Direction",
    "Perpetual Lost",
    "Negotiation Tactician",
    "Concession Giver",
    "Fashion Forward",
    "Fashionably Late",
    "DIY Medical Kit",
    "Health Nut",
    "Fast Healer",
    "Fragile Constitution",
    "Logical Analyzer",
    "Spiritual Seeker",
    "Animal Whisperer",
    "Allergic to Pets",
    "Green Thumb Failure",
    "Crafty Maker",
    "Tech-Phobic",
    "Quick Wit",
    "Dry Humor",];

/// Draw `count` distinct perks from the catalog (fewer if the catalog is smaller)
pub fn sample_perks<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Vec<String> {
    ALL_PERKS
        .choose_multiple(rng, count)
        .map(|p| p.to_string())
        .collect()
}

pub fn is_catalog_perk(name: &str) -> bool {
    ALL_PERKS.contains(&name)
}
