//! Starter code shown in the editor when a step opens

use crate::domain::CodeLanguage::{self, Rust, TypeScript};

pub(super) fn entries() -> Vec<(&'static str, CodeLanguage, &'static str)> {
    vec![
        (
            "hello_greeting",
            Rust,
            "fn main() {\n    // Declare your greeting here\n}\n",
        ),
        (
            "hello_greeting",
            TypeScript,
            "// Declare your greeting here\n",
        ),
        (
            "hello_function",
            Rust,
            "let greeting = \"Hello, Solana!\";\n\n// Define say_hello below\n",
        ),
        (
            "hello_function",
            TypeScript,
            "const greeting = \"Hello, Solana!\";\n\n// Define sayHello below\n",
        ),
        (
            "accounts_pasture",
            Rust,
            "use anchor_lang::prelude::*;\n\n// Declare the Pasture account\n",
        ),
        (
            "accounts_pasture",
            TypeScript,
            "import * as anchor from \"@coral-xyz/anchor\";\n\n// Describe the PastureAccount\n",
        ),
        (
            "accounts_lamports",
            Rust,
            "#[account]\npub struct Pasture {\n    // How many lamports does it hold?\n}\n",
        ),
        (
            "instructions_initialize",
            Rust,
            "use anchor_lang::prelude::*;\n\n#[derive(Accounts)]\npub struct Initialize {}\n\n// Write the handler\n",
        ),
        (
            "instructions_ok",
            Rust,
            "pub fn initialize(ctx: Context<Initialize>) -> Result<()> {\n    // Report success\n}\n",
        ),
        (
            "anchor_program",
            Rust,
            "use anchor_lang::prelude::*;\n\ndeclare_id!(\"Ranch111111111111111111111111111111111111111\");\n\n// Declare the program module\n",
        ),
        (
            "anchor_program",
            TypeScript,
            "import * as anchor from \"@coral-xyz/anchor\";\n\nanchor.setProvider(anchor.AnchorProvider.env());\n// Load the Ranch program from the workspace\n",
        ),
        (
            "anchor_accounts",
            Rust,
            "pub struct Initialize<'info> {\n    pub system_program: Program<'info, System>,\n}\n",
        ),
        (
            "pda_seeds",
            Rust,
            "#[derive(Accounts)]\npub struct CreateRanch<'info> {\n    #[account(init, payer = owner, space = 8 + 48)]\n    pub ranch: Account<'info, Ranch>,\n    #[account(mut)]\n    pub owner: Signer<'info>,\n    pub system_program: Program<'info, System>,\n}\n",
        ),
        (
            "pda_find",
            Rust,
            "let owner: Pubkey = payer.pubkey();\n// Derive the ranch address from [b\"ranch\", owner]\n",
        ),
        (
            "pda_find",
            TypeScript,
            "const owner = provider.wallet.publicKey;\n// Derive the ranch address from [\"ranch\", owner]\n",
        ),
        (
            "ranch_owner",
            Rust,
            "use anchor_lang::prelude::*;\n\n#[account]\npub struct Ranch {\n    // Add the owner field here\n}\n",
        ),
        (
            "ranch_owner",
            TypeScript,
            "import { PublicKey } from \"@solana/web3.js\";\n\ninterface Ranch {\n  // Add the owner field here\n}\n",
        ),
        (
            "ranch_ledger",
            Rust,
            "#[account]\npub struct Ranch {\n    pub owner: Pubkey,\n    // Add coins and experience\n}\n",
        ),
        (
            "ranch_barn",
            Rust,
            "const BARN_COST: u64 = 100;\n\n// Write build_barn(ctx: Context<Build>) -> Result<()>\n",
        ),
        (
            "nft_mint_to",
            Rust,
            "use anchor_spl::token;\n\npub fn mint_badge(ctx: Context<MintBadge>) -> Result<()> {\n    // Mint one badge to the ranch hand\n    Ok(())\n}\n",
        ),
    ]
}
