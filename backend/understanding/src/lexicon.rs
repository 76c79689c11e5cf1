//! Item vocabulary used by the categorizer rules.
//!
//! All entries are written in display case; matching is case-insensitive.

/// The 33 canonical runes, lowest to highest.
pub const RUNES: [&str; 33] = [
    "El", "Eld", "Tir", "Nef", "Eth", "Ith", "Tal", "Ral", "Ort", "Thul", "Amn", "Sol", "Shael",
    "Dol", "Hel", "Io", "Lum", "Ko", "Fal", "Lem", "Pul", "Um", "Mal", "Ist", "Gul", "Vex", "Ohm",
    "Lo", "Sur", "Ber", "Jah", "Cham", "Zod",
];

pub const RUNEWORDS: &[&str] = &[
    "Ancient's Pledge", "Beast", "Black", "Bone", "Bramble", "Brand", "Breath of the Dying",
    "Bulwark", "Call to Arms", "Chains of Honor", "Chaos", "Crescent Moon", "Cure", "Death",
    "Delirium", "Destruction", "Doom", "Dragon", "Dream", "Duress", "Edge", "Enigma",
    "Enlightenment", "Eternity", "Exile", "Faith", "Famine", "Flickering Flame", "Fortitude",
    "Fury", "Gloom", "Grief", "Ground", "Hand of Justice", "Harmony", "Hearth",
    "Heart of the Oak", "Holy Thunder", "Honor", "Hustle", "Ice", "Infinity", "Insight",
    "King's Grace", "Kingslayer", "Last Wish", "Lawbringer", "Leaf", "Lionheart", "Lore",
    "Malice", "Melody", "Memory", "Metamorphosis", "Mist", "Mosaic", "Myth", "Nadir", "Oath",
    "Obedience", "Obsession", "Passion", "Pattern", "Peace", "Phoenix", "Plague", "Pride",
    "Principle", "Prudence", "Radiance", "Rain", "Rhyme", "Rift", "Sanctuary", "Silence",
    "Smoke", "Spirit", "Splendor", "Stealth", "Steel", "Stone", "Strength", "Temper",
    "Treachery", "Unbending Will", "Venom", "Voice of Reason", "Wealth", "White", "Wind",
    "Wisdom", "Wrath", "Zephyr",
];

pub const GEM_GRADES: &[&str] = &["Chipped", "Flawed", "Flawless", "Perfect"];

pub const GEM_TYPES: &[&str] = &[
    "Amethyst", "Topaz", "Sapphire", "Emerald", "Ruby", "Diamond", "Skull",
];

pub const CHARM_TYPES: &[&str] = &["Small Charm", "Large Charm", "Grand Charm"];

pub const ARMOR_BASES: &[&str] = &[
    // Body armor
    "Quilted Armor", "Leather Armor", "Hard Leather Armor", "Studded Leather", "Ring Mail",
    "Scale Mail", "Chain Mail", "Breast Plate", "Splint Mail", "Plate Mail", "Field Plate",
    "Gothic Plate", "Full Plate Mail", "Ancient Armor", "Light Plate", "Ghost Armor",
    "Serpentskin Armor", "Demonhide Armor", "Trellised Armor", "Linked Mail", "Tigulated Mail",
    "Mesh Armor", "Cuirass", "Russet Armor", "Templar Coat", "Sharktooth Armor",
    "Embossed Plate", "Chaos Armor", "Ornate Plate", "Mage Plate", "Dusk Shroud", "Wyrmhide",
    "Scarab Husk", "Wire Fleece", "Diamond Mail", "Loricated Mail", "Boneweave",
    "Great Hauberk", "Balrog Skin", "Hellforge Plate", "Kraken Shell", "Lacquered Plate",
    "Shadow Plate", "Sacred Armor", "Archon Plate",
    // Helms and circlets
    "Cap", "Skull Cap", "Helm", "Full Helm", "Great Helm", "Crown", "Mask", "Bone Helm",
    "War Hat", "Sallet", "Casque", "Basinet", "Winged Helm", "Grand Crown", "Death Mask",
    "Grim Helm", "Shako", "Hydraskull", "Armet", "Giant Conch", "Spired Helm", "Corona",
    "Demonhead", "Bone Visage", "Circlet", "Coronet", "Tiara", "Diadem",
    // Shields
    "Buckler", "Small Shield", "Large Shield", "Kite Shield", "Tower Shield", "Gothic Shield",
    "Bone Shield", "Spiked Shield", "Defender", "Round Shield", "Scutum", "Dragon Shield",
    "Pavise", "Ancient Shield", "Grim Shield", "Barbed Shield", "Heater", "Luna", "Hyperion",
    "Monarch", "Aegis", "Ward", "Troll Nest", "Blade Barrier",
    // Gloves
    "Leather Gloves", "Heavy Gloves", "Chain Gloves", "Light Gauntlets", "Gauntlets",
    "Demonhide Gloves", "Sharkskin Gloves", "Heavy Bracers", "Battle Gauntlets",
    "War Gauntlets", "Bramble Mitts", "Vampirebone Gloves", "Vambraces", "Crusader Gauntlets",
    "Ogre Gauntlets",
    // Boots
    "Boots", "Heavy Boots", "Chain Boots", "Light Plated Boots", "Greaves", "Demonhide Boots",
    "Sharkskin Boots", "Mesh Boots", "Battle Boots", "War Boots", "Wyrmhide Boots",
    "Scarabshell Boots", "Boneweave Boots", "Mirrored Boots", "Myrmidon Greaves",
    // Belts
    "Sash", "Light Belt", "Belt", "Heavy Belt", "Plated Belt", "Demonhide Sash",
    "Sharkskin Belt", "Mesh Belt", "Battle Belt", "War Belt", "Spiderweb Sash",
    "Vampirefang Belt", "Mithril Coil", "Troll Belt", "Colossus Girdle",
    // Class-specific
    "Wolf Head", "Hawk Helm", "Antlers", "Falcon Mask", "Spirit Mask", "Alpha Helm",
    "Griffon Headdress", "Hunter's Guise", "Sacred Feathers", "Totemic Mask", "Blood Spirit",
    "Sun Spirit", "Earth Spirit", "Sky Spirit", "Dream Spirit", "Jawbone Cap", "Fanged Helm",
    "Horned Helm", "Assault Helmet", "Avenger Guard", "Jawbone Visor", "Lion Helm",
    "Rage Mask", "Savage Helmet", "Slayer Guard", "Carnage Helm", "Fury Visor",
    "Destroyer Helm", "Conqueror Crown", "Guardian Crown", "Targe", "Rondache",
    "Heraldic Shield", "Aerin Shield", "Crown Shield", "Akaran Targe", "Akaran Rondache",
    "Protector Shield", "Gilded Shield", "Royal Shield", "Sacred Targe", "Sacred Rondache",
    "Kurast Shield", "Zakarum Shield", "Vortex Shield", "Preserved Head", "Zombie Head",
    "Unraveller Head", "Gargoyle Head", "Demon Head", "Mummified Trophy", "Fetish Trophy",
    "Sexton Trophy", "Cantor Trophy", "Hierophant Trophy", "Minion Skull", "Hellspawn Skull",
    "Overseer Skull", "Succubus Skull", "Bloodlord Skull",
];

pub const WEAPON_BASES: &[&str] = &[
    // Axes
    "Hand Axe", "Axe", "Double Axe", "Military Pick", "War Axe", "Large Axe", "Broad Axe",
    "Battle Axe", "Great Axe", "Giant Axe", "Hatchet", "Cleaver", "Twin Axe", "Crowbill",
    "Naga", "Military Axe", "Bearded Axe", "Tabar", "Gothic Axe", "Ancient Axe", "Tomahawk",
    "Small Crescent", "Ettin Axe", "War Spike", "Berserker Axe", "Feral Axe",
    "Silver-edged Axe", "Decapitator", "Champion Axe", "Glorious Axe",
    // Wands
    "Wand", "Yew Wand", "Bone Wand", "Grim Wand", "Burnt Wand", "Petrified Wand", "Tomb Wand",
    "Grave Wand", "Polished Wand", "Ghost Wand", "Lich Wand", "Unearthed Wand",
    // Blunt
    "Club", "Spiked Club", "Mace", "Morning Star", "Flail", "War Hammer", "Maul", "Great Maul",
    "Cudgel", "Barbed Club", "Flanged Mace", "Jagged Star", "Knout", "Battle Hammer",
    "War Club", "Martel de Fer", "Truncheon", "Tyrant Club", "Reinforced Mace", "Devil Star",
    "Scourge", "Legendary Mallet", "Ogre Maul", "Thunder Maul", "Scepter", "Grand Scepter",
    "War Scepter", "Rune Scepter", "Holy Water Sprinkler", "Divine Scepter", "Mighty Scepter",
    "Seraph Rod", "Caduceus",
    // Swords
    "Short Sword", "Scimitar", "Sabre", "Falchion", "Crystal Sword", "Broad Sword",
    "Long Sword", "War Sword", "Two-Handed Sword", "Claymore", "Giant Sword", "Bastard Sword",
    "Flamberge", "Great Sword", "Gladius", "Cutlass", "Shamshir", "Tulwar",
    "Dimensional Blade", "Battle Sword", "Rune Sword", "Ancient Sword", "Espandon",
    "Dacian Falx", "Tusk Sword", "Gothic Sword", "Zweihander", "Executioner Sword", "Falcata",
    "Ataghan", "Elegant Blade", "Hydra Edge", "Phase Blade", "Conquest Sword",
    "Cryptic Sword", "Mythical Sword", "Legend Sword", "Highland Blade", "Balrog Blade",
    "Champion Sword", "Colossus Sword", "Colossus Blade",
    // Daggers and throwing
    "Dagger", "Dirk", "Kris", "Blade", "Poignard", "Rondel", "Cinquedeas", "Stiletto",
    "Bone Knife", "Mithril Point", "Fanged Knife", "Legend Spike", "Throwing Knife",
    "Throwing Axe", "Balanced Knife", "Balanced Axe", "Battle Dart", "Francisca", "War Dart",
    "Hurlbat", "Flying Knife", "Flying Axe", "Winged Knife", "Winged Axe",
    // Javelins, spears, polearms
    "Javelin", "Pilum", "Short Spear", "Glaive", "Throwing Spear", "War Javelin",
    "Great Pilum", "Simbilan", "Spiculum", "Harpoon", "Hyperion Javelin", "Stygian Pilum",
    "Balrog Spear", "Ghost Glaive", "Winged Harpoon", "Spear", "Trident", "Brandistock",
    "Spetum", "Pike", "War Fork", "Yari", "Lance", "Fuscina", "War Pike", "Hyperion Spear",
    "Stygian Pike", "Mancatcher", "Ghost Spear", "Bardiche", "Voulge", "Scythe", "Poleaxe",
    "Halberd", "War Scythe", "Lochaber Axe", "Bill", "Battle Scythe", "Partizan",
    "Bec-de-Corbin", "Grim Scythe", "Ogre Axe", "Colossus Voulge", "Thresher", "Cryptic Axe",
    "Great Poleaxe", "Giant Thresher",
    // Staves
    "Short Staff", "Long Staff", "Gnarled Staff", "Battle Staff", "War Staff", "Jo Staff",
    "Quarterstaff", "Cedar Staff", "Gothic Staff", "Rune Staff", "Walking Stick",
    "Stalagmite", "Elder Staff", "Shillelagh", "Archon Staff",
    // Bows and crossbows
    "Short Bow", "Hunter's Bow", "Long Bow", "Composite Bow", "Short Battle Bow",
    "Long Battle Bow", "Short War Bow", "Long War Bow", "Edge Bow", "Razor Bow", "Cedar Bow",
    "Double Bow", "Short Siege Bow", "Large Siege Bow", "Rune Bow", "Gothic Bow",
    "Spider Bow", "Blade Bow", "Shadow Bow", "Great Bow", "Diamond Bow", "Crusader Bow",
    "Ward Bow", "Hydra Bow", "Light Crossbow", "Crossbow", "Heavy Crossbow",
    "Repeating Crossbow", "Arbalest", "Siege Crossbow", "Ballista", "Chu-Ko-Nu",
    "Pellet Bow", "Gorgon Crossbow", "Colossus Crossbow", "Demon Crossbow",
    // Class-specific
    "Katar", "Wrist Blade", "Hatchet Hands", "Cestus", "Claws", "Blade Talons",
    "Scissors Katar", "Quhab", "Wrist Spike", "Fascia", "Hand Scythe", "Greater Claws",
    "Greater Talons", "Scissors Quhab", "Suwayyah", "Wrist Sword", "War Fist",
    "Battle Cestus", "Feral Claws", "Runic Talons", "Scissors Suwayyah", "Eagle Orb",
    "Sacred Globe", "Smoked Sphere", "Clasped Orb", "Jared's Stone", "Glowing Orb",
    "Crystalline Globe", "Cloudy Sphere", "Sparkling Ball", "Swirling Crystal",
    "Heavenly Stone", "Eldritch Orb", "Demon Heart", "Vortex Orb", "Dimensional Shard",
    "Stag Bow", "Reflex Bow", "Maiden Spear", "Maiden Pike", "Maiden Javelin",
    "Ceremonial Bow", "Ceremonial Spear", "Ceremonial Pike", "Ceremonial Javelin",
    "Matriarchal Bow", "Grand Matron Bow", "Matriarchal Spear", "Matriarchal Pike",
    "Matriarchal Javelin",
];

/// Quest items, consumables, keys and crafting materials.
pub const MISC_PHRASES: &[&str] = &[
    "Key of Terror", "Key of Hate", "Key of Destruction", "Token of Absolution",
    "Twisted Essence of Suffering", "Charged Essence of Hatred", "Burning Essence of Terror",
    "Festering Essence of Destruction", "Diablo's Horn", "Baal's Eye", "Mephisto's Brain",
    "Standard of Heroes", "Worldstone Shard", "Healing Potion", "Mana Potion",
    "Rejuvenation Potion", "Full Rejuvenation Potion", "Stamina Potion", "Antidote Potion",
    "Thawing Potion", "Scroll of Town Portal", "Scroll of Identify", "Tome of Town Portal",
    "Tome of Identify",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn rune_list_is_complete_and_unique() {
        let set: HashSet<_> = RUNES.iter().map(|r| r.to_lowercase()).collect();
        assert_eq!(set.len(), 33);
    }

    #[test]
    fn base_lists_do_not_overlap() {
        let armor: HashSet<_> = ARMOR_BASES.iter().map(|s| s.to_lowercase()).collect();
        for weapon in WEAPON_BASES {
            assert!(!armor.contains(&weapon.to_lowercase()), "{weapon} in both lists");
        }
    }
}
