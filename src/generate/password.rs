use rand::Rng;

// Word lists sized 28/28/24; with the trailing digit that is 28*28*24*10
// combinations. Mnemonic only, NOT cryptographically strong.
pub const ADJECTIVES: [&str; 28] = [
    "Veselý", "Smutný", "Rýchly", "Pomalý", "Veľký", "Malý", "Silný", "Slabý", "Múdry", "Hlúpy",
    "Pekný", "Škaredý", "Dobrý", "Zlý", "Nový", "Starý", "Teplý", "Studený", "Tvrdý", "Mäkký",
    "Jazvec", "Líška", "Medveď", "Vlk", "Tiger", "Lev", "Orol", "Sokol",
];

pub const NOUNS: [&str; 28] = [
    "Dom", "Auto", "Loď", "Lietadlo", "Počítač", "Telefón", "Kniha", "Pero", "Stôl", "Stolička",
    "Okno", "Dvere", "Strom", "Kvet", "Tráva", "Kameň", "Voda", "Oheň", "Vzduch", "Zem", "Slnko",
    "Mesiac", "Hviezda", "Obloha", "Spánok", "Beh", "Skok", "Tanec",
];

pub const QUALIFIERS: [&str; 24] = [
    "Skrytý", "Viditeľný", "Tajný", "Verejný", "Tichý", "Hlučný", "Jasný", "Tmavý", "Vysoký",
    "Nízky", "Široký", "Úzky", "Plný", "Prázdny", "Ťažký", "Ľahký", "Mokrý", "Suchý", "Čistý",
    "Špinavý", "Horúci", "Chladný", "Sladký", "Horký",
];

/// A memorable `{Adjective}-{Noun}-{Qualifier}{Digit}` password.
pub fn generate_password() -> String {
    generate_with(&mut rand::thread_rng())
}

/// Same, seeded by the caller for deterministic tests.
pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let adjective = ADJECTIVES[rng.gen_range(0..ADJECTIVES.len())];
    let noun = NOUNS[rng.gen_range(0..NOUNS.len())];
    let qualifier = QUALIFIERS[rng.gen_range(0..QUALIFIERS.len())];
    let digit = rng.gen_range(0..10);

    format!("{}-{}-{}{}", adjective, noun, qualifier, digit)
}
