use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;

use chain_hash::Builder;
use chain_hash::key::EqFn;
use chain_hash::key::HashFn;
use clap::Parser;

/// Inserts a handful of bank accounts keyed by (client, bank, branch, number)
/// and prints the bucket layout as the table grows.
#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 's', long = "initial_size", default_value_t = 2)]
    initial_size: usize,

    /// Account numbers to look up and remove after loading.
    #[arg(short = 'r', long = "remove")]
    remove: Vec<i32>,
}

type AccountKey = (String, i32, i32, i32);

#[derive(Clone, Debug, PartialEq)]
struct Account {
    client_name: String,
    bank_code: i32,
    branch_code: i32,
    number: i32,
    balance: f32,
}

impl Account {
    fn new(client_name: &str, bank_code: i32, branch_code: i32, number: i32, balance: f32) -> Self {
        Self {
            client_name: client_name.to_string(),
            bank_code,
            branch_code,
            number,
            balance,
        }
    }

    fn key(&self) -> AccountKey {
        (
            self.client_name.clone(),
            self.bank_code,
            self.branch_code,
            self.number,
        )
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[ Client: <{}> Bank: <{}> Branch: <{}> Number: <{}> Balance: <{}> ]",
            self.client_name, self.bank_code, self.branch_code, self.number, self.balance
        )
    }
}

fn hash_part(part: impl Hash) -> u64 {
    let mut hasher = DefaultHasher::new();
    part.hash(&mut hasher);
    hasher.finish()
}

/// Mixes each key field with its own power of 37.
fn hash_account_key(key: &AccountKey) -> u64 {
    hash_part(&key.0).wrapping_mul(37)
        ^ hash_part(key.1).wrapping_mul(37u64.pow(2))
        ^ hash_part(key.2).wrapping_mul(37u64.pow(3))
        ^ hash_part(key.3).wrapping_mul(37u64.pow(4))
}

fn main() -> Result<(), chain_hash::TableError> {
    let args = Args::parse();

    let mut accounts = Builder::new()
        .initial_size(args.initial_size)
        .with_hasher(HashFn(hash_account_key))
        .with_key_eq(EqFn(|a: &AccountKey, b: &AccountKey| {
            a.0 == b.0 && a.1 == b.1 && a.2 == b.2 && a.3 == b.3
        }))
        .build()?;

    println!(
        "Created account table with {} buckets (requested {})",
        accounts.capacity(),
        args.initial_size
    );

    let seed = [
        Account::new("Jose Silva", 1, 1668, 20123, 1500.0),
        Account::new("Carlos Prado", 1, 1668, 35091, 1250.0),
        Account::new("Aline Bastos", 13, 33, 55723, 500.0),
        Account::new("Pedro Gomes", 1, 1801, 87661, 5800.0),
        Account::new("Julio Gouveia", 12, 1709, 33678, 1300.0),
        Account::new("Raissa Meireles", 52, 8076, 94230, 7800.0),
    ];

    for account in &seed {
        let capacity = accounts.capacity();
        accounts.try_insert(account.key(), account.clone())?;
        if accounts.capacity() != capacity {
            println!(
                ">>> grew from {} to {} buckets",
                capacity,
                accounts.capacity()
            );
        }
    }

    println!(
        "\n>>> {} accounts in {} buckets:",
        accounts.len(),
        accounts.capacity()
    );
    accounts.show_structure();

    for number in args.remove {
        let Some(key) = seed
            .iter()
            .find(|account| account.number == number)
            .map(Account::key)
        else {
            println!("\nAccount {} not found.", number);
            continue;
        };

        match accounts.retrieve(&key) {
            Some(account) => {
                println!("\n{} {}", account.number, account.balance);
                println!("Removing this account....");
                accounts.remove(&key);
            }
            None => println!("\nAccount {} not found.", number),
        }
        accounts.show_structure();
    }

    println!("\n>>> Normal exiting...");

    Ok(())
}
