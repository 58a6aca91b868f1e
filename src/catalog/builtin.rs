//! Lessons shipped with the application
//!
//! Regex patterns here are checked when the catalog is built.

use crate::domain::{
    Badge, CodeLanguage, Difficulty, Lesson, Quiz, RuleKind, Step, ValidationRule,
};

use CodeLanguage::{Rust, TypeScript};

/// Regex rule, checked later by `LessonCatalog::new`
fn re(pattern: &str, message: &str) -> ValidationRule {
    ValidationRule {
        kind: RuleKind::Regex,
        pattern: pattern.to_string(),
        message: message.to_string(),
        required: true,
    }
}

fn badge(name: &str, image: &str) -> Option<Badge> {
    Some(Badge {
        name: name.to_string(),
        image: image.to_string(),
    })
}

pub(super) fn lessons() -> Vec<Lesson> {
    vec![
        hello_solana(),
        accounts(),
        instructions(),
        anchor(),
        pdas(),
        ranch_account(),
        badge_nfts(),
    ]
}

fn hello_solana() -> Lesson {
    Lesson {
        id: 1,
        title: "Hello, Solana!".to_string(),
        description: "Saddle up: meet the chain your ranch will live on and write your first lines."
            .to_string(),
        chapter: 1,
        difficulty: Difficulty::Beginner,
        estimated_minutes: 10,
        premium: false,
        reward: 50,
        badge: badge("Greenhorn Spur", "badges/greenhorn-spur.png"),
        required_lessons: vec![],
        steps: vec![
            Step::narrative(
                1,
                "Welcome to the Ranch",
                "Every ranch needs land. On Solana, the land is a network of validators that run programs for everyone.",
                Quiz::multiple_choice(
                    "Where does a Solana program run?",
                    &["On validators", "In your browser", "On a printer"],
                    "On validators",
                ),
            )
            .messages("Right, the validators keep the ranch running.", "Think about who runs the network.")
            .effect("network_ping"),
            Step::code(
                2,
                "Say Howdy",
                "Declare a variable named `greeting` holding the text \"Hello, Solana!\".",
            )
            .rule(ValidationRule::variable_exists("greeting", "Declare a variable named `greeting`"))
            .rule(ValidationRule::contains("Hello, Solana!", "Your greeting should say \"Hello, Solana!\""))
            .messages("Howdy, partner! The ranch heard you.", "The ranch didn't hear a proper greeting.")
            .starter("hello_greeting")
            .hint("In Rust, variables are declared with `let`."),
            Step::code(
                3,
                "Your First Function",
                "Wrap the greeting in a function called `say_hello`.",
            )
            .rule(ValidationRule::function_exists("say_hello", "Define a function named `say_hello`"))
            .rule(ValidationRule::contains("greeting", "Use your `greeting` inside the function"))
            .rule(ValidationRule::contains("println!", "Print the greeting with `println!`").optional())
            .messages("Your first function is on the range.", "The function isn't quite there yet.")
            .starter("hello_function"),
        ],
    }
}

fn accounts() -> Lesson {
    Lesson {
        id: 2,
        title: "Accounts Are Pastures".to_string(),
        description: "Programs keep no state of their own. Learn where data lives on Solana.".to_string(),
        chapter: 1,
        difficulty: Difficulty::Beginner,
        estimated_minutes: 15,
        premium: false,
        reward: 75,
        badge: None,
        required_lessons: vec![1],
        steps: vec![
            Step::narrative(
                1,
                "Fenced Data",
                "Programs are stateless. Everything they remember is stored in accounts, like cattle in a pasture.",
                Quiz::true_false("Programs on Solana store their state inside accounts.", true),
            ),
            Step::code(
                2,
                "Mark an Account",
                "Declare a struct named `Pasture` and mark it with `#[account]`.",
            )
            .expect(Rust, r"#\[account\]\s*pub\s+struct\s+Pasture")
            .expect(TypeScript, r"class\s+PastureAccount")
            .messages("The pasture is fenced in.", "Mark a public `Pasture` struct with `#[account]`.")
            .starter("accounts_pasture"),
            Step::code(
                3,
                "Count the Lamports",
                "Give `Pasture` a `u64` field and mention how many lamports it holds.",
            )
            .rule(re(r"pub\s+\w+:\s*u64", "Add a public `u64` field"))
            .rule(ValidationRule::contains("lamports", "Mention `lamports` somewhere"))
            .messages("Every pasture has its price.", "The pasture still needs a balance field.")
            .starter("accounts_lamports"),
        ],
    }
}

fn instructions() -> Lesson {
    Lesson {
        id: 3,
        title: "Instructions and Handlers".to_string(),
        description: "Teach your program to respond when a transaction rides in.".to_string(),
        chapter: 2,
        difficulty: Difficulty::Beginner,
        estimated_minutes: 20,
        premium: false,
        reward: 100,
        badge: None,
        required_lessons: vec![2],
        steps: vec![
            Step::code(
                1,
                "The Initialize Handler",
                "Write a handler `initialize` that takes a `Context`.",
            )
            .rule(ValidationRule::function_exists("initialize", "Define `initialize`"))
            .rule(re(r"Context<\w+>", "Take a `Context<...>` argument"))
            .messages("The gate swings open.", "The handler needs a name and a context.")
            .starter("instructions_initialize")
            .effect("network_ping"),
            Step::code(
                2,
                "Report Success",
                "Return `Ok(())` from your handler. Logging with `msg!` is a nice touch.",
            )
            .rule(ValidationRule::contains("Ok(())", "Return `Ok(())`"))
            .rule(ValidationRule::contains("msg!", "Log something with `msg!`").optional())
            .messages("Transaction confirmed!", "Handlers must return a `Result`.")
            .starter("instructions_ok")
            .reward(15, 30),
        ],
    }
}

fn anchor() -> Lesson {
    Lesson {
        id: 4,
        title: "The Anchor Framework".to_string(),
        description: "Anchor ropes the boilerplate so you can focus on the ranch.".to_string(),
        chapter: 2,
        difficulty: Difficulty::Intermediate,
        estimated_minutes: 25,
        premium: false,
        reward: 120,
        badge: badge("Anchor Wrangler", "badges/anchor-wrangler.png"),
        required_lessons: vec![3],
        steps: vec![
            Step::code(1, "Declare the Program", "Declare a module named `ranch` with `#[program]`.")
                .expect(Rust, r"#\[program\]\s*pub\s+mod\s+ranch")
                .expect(TypeScript, r"anchor\.workspace\.Ranch")
                .messages("The program is on the map.", "Use `#[program]` on a `pub mod ranch`.")
                .starter("anchor_program"),
            Step::code(
                2,
                "Accounts Context",
                "Derive `Accounts` for an `Initialize` struct with a signer.",
            )
            .rule(re(r"#\[derive\(Accounts\)\]", "Derive `Accounts`"))
            .rule(ValidationRule::contains("Signer<'info>", "Someone has to sign: add a `Signer<'info>`"))
            .messages("Accounts are lined up.", "The context struct is missing pieces.")
            .starter("anchor_accounts"),
            Step::narrative(
                3,
                "Macro Roundup",
                "Anchor leans on a few attribute macros. Time to sort them out.",
                Quiz::multiple_choice(
                    "Which macro marks the program's instruction module?",
                    &["#[program]", "#[account]", "#[derive(Accounts)]"],
                    "#[program]",
                ),
            ),
        ],
    }
}

fn pdas() -> Lesson {
    Lesson {
        id: 5,
        title: "Program Derived Addresses".to_string(),
        description: "Brand your accounts with addresses only your program can sign for.".to_string(),
        chapter: 3,
        difficulty: Difficulty::Intermediate,
        estimated_minutes: 25,
        premium: false,
        reward: 150,
        badge: None,
        required_lessons: vec![4],
        steps: vec![
            Step::code(1, "Seeds and Bumps", "Constrain an account with `seeds` and a `bump`.")
                .rule(re(r"seeds\s*=\s*\[", "Add a `seeds = [...]` constraint"))
                .rule(ValidationRule::contains("bump", "Don't forget the `bump`"))
                .messages("Branded and bumped.", "The PDA constraint is incomplete.")
                .starter("pda_seeds"),
            Step::code(2, "Find the Address", "Derive the PDA address from the client side.")
                .expect(Rust, r"Pubkey::find_program_address\(")
                .expect(TypeScript, r"PublicKey\.findProgramAddressSync\(")
                .messages("Address found on the trail.", "Use the SDK helper to derive the address.")
                .starter("pda_find"),
        ],
    }
}

fn ranch_account() -> Lesson {
    Lesson {
        id: 6,
        title: "Building the Ranch Account".to_string(),
        description: "Put it all together: the account that holds your ranch.".to_string(),
        chapter: 3,
        difficulty: Difficulty::Intermediate,
        estimated_minutes: 30,
        premium: false,
        reward: 200,
        badge: badge("Ranch Deed", "badges/ranch-deed.png"),
        required_lessons: vec![5],
        steps: vec![
            Step::code(1, "Who Owns the Ranch?", "Add a public `owner` field of type `Pubkey` to `Ranch`.")
                .expect(Rust, r"pub\s+owner:\s*Pubkey,")
                .expect(TypeScript, r"owner:\s*PublicKey")
                .messages("The deed is signed. The ranch is yours.", "The ranch needs an owner field.")
                .starter("ranch_owner")
                .hint("Fields in an Anchor account are `pub name: Type,`.")
                .effect("network_ping"),
            Step::code(2, "Ranch Ledger", "Track the ranch's coins and experience as `u64` fields.")
                .rule(re(r"pub\s+coins:\s*u64,", "Add `pub coins: u64,`"))
                .rule(re(r"pub\s+experience:\s*u64,", "Add `pub experience: u64,`"))
                .messages("The ledger is open.", "The ledger is missing a column.")
                .starter("ranch_ledger"),
            Step::code(3, "Build a Barn", "Write `build_barn`: check the ranch can afford it, then pay.")
                .rule(ValidationRule::function_exists("build_barn", "Define `build_barn`"))
                .rule(re(r"require!\(\s*ranch\.coins\s*>=", "Check the balance with `require!`"))
                .rule(ValidationRule::contains("ranch.coins -=", "Deduct the cost from `ranch.coins`"))
                .messages("A fine barn rises on the prairie.", "The barn plan has a hole in it.")
                .starter("ranch_barn")
                .effect("coin_burst")
                .reward(25, 50),
        ],
    }
}

fn badge_nfts() -> Lesson {
    Lesson {
        id: 7,
        title: "Minting Badge NFTs".to_string(),
        description: "Mint one-of-a-kind badges for your best ranch hands.".to_string(),
        chapter: 4,
        difficulty: Difficulty::Advanced,
        estimated_minutes: 40,
        premium: true,
        reward: 300,
        badge: badge("Golden Horseshoe", "badges/golden-horseshoe.png"),
        required_lessons: vec![6],
        steps: vec![
            Step::code(1, "Mint To", "Mint exactly one token with a `MintTo` CPI.")
                .rule(re(r"token::MintTo\s*\{", "Build a `token::MintTo` context"))
                .rule(ValidationRule::contains("mint_to", "Call `mint_to`"))
                .rule(re(r"mint_to\([^;]*,\s*1\s*\)", "Mint exactly one token").optional())
                .messages("A badge is minted.", "The mint instruction isn't complete.")
                .starter("nft_mint_to"),
            Step::narrative(
                2,
                "One of a Kind",
                "An NFT is a mint with a supply of one that can't be split.",
                Quiz::multiple_choice("How many decimals does an NFT mint use?", &["0", "6", "9"], "0"),
            ),
        ],
    }
}
