use lsd_reader::{BitReader, ByteSource, FileSource, RotatingKey, XoringSource};
use std::env;
use std::process;

struct Options {
    path: String,
    offset: u64,
    count: usize,
    key: Option<u8>,
    bits: Option<u32>,
}

fn usage(program: &str) -> ! {
    eprintln!(
        "Usage: {} <path-to-lsd-file> [--offset N] [--count N] [--key HEX] [--bits W]",
        program
    );
    process::exit(1);
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    let idx = args.iter().position(|arg| arg == flag)?;
    match args.get(idx + 1) {
        Some(value) => Some(value.as_str()),
        None => {
            eprintln!("ERROR: {} flag requires an argument.", flag);
            process::exit(1);
        }
    }
}

fn parse_or_exit<T>(
    value: Option<&str>,
    flag: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    value.map(|v| {
        parse(v).unwrap_or_else(|| {
            eprintln!("ERROR: Invalid value for {}: {}", flag, v);
            process::exit(1);
        })
    })
}

fn parse_args(args: &[String]) -> Options {
    if args.len() < 2 || args[1].starts_with("--") {
        usage(args.first().map_or("lsd-peek", |s| s.as_str()));
    }

    let offset = parse_or_exit(flag_value(args, "--offset"), "--offset", |v| {
        v.parse::<u64>().ok()
    });
    let count = parse_or_exit(flag_value(args, "--count"), "--count", |v| {
        v.parse::<usize>().ok()
    });
    let key = parse_or_exit(flag_value(args, "--key"), "--key", |v| {
        u8::from_str_radix(v.trim_start_matches("0x"), 16).ok()
    });
    let bits = parse_or_exit(flag_value(args, "--bits"), "--bits", |v| {
        v.parse::<u32>().ok().filter(|w| (1..=32).contains(w))
    });

    Options {
        path: args[1].clone(),
        offset: offset.unwrap_or(0),
        count: count.unwrap_or(64),
        key,
        bits,
    }
}

fn peek<S: ByteSource>(reader: &mut BitReader<S>, opts: &Options) -> lsd_reader::Result<()> {
    reader.seek(opts.offset);
    println!("Offset: {} (file length {})", reader.tell(), reader.get_ref().len());

    match opts.bits {
        Some(width) => {
            for i in 0..opts.count {
                let value = reader.read_bits(width)?;
                println!("  [{:>4}] {:#x}", i, value);
            }
        }
        None => {
            let bytes = reader.read_raw_bytes(opts.count)?;
            for (row, chunk) in bytes.chunks(16).enumerate() {
                let hex: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
                println!("  {:08x}  {}", opts.offset + row as u64 * 16, hex.join(" "));
            }
            if bytes.len() < opts.count {
                println!("  (end of file after {} bytes)", bytes.len());
            }
        }
    }
    println!("Stopped at byte {}", reader.tell());
    Ok(())
}

fn main() {
    let args: Vec<String> = env::args().collect();
    let opts = parse_args(&args);

    println!("Reading LSD file: {}", opts.path);
    println!("{}", "=".repeat(60));

    let source = match FileSource::open(&opts.path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("\nERROR: Failed to open file");
            eprintln!("  {}", e);
            process::exit(1);
        }
    };

    let result = match opts.key {
        Some(key) => {
            println!("De-obfuscating with key {:#04x}", key);
            let mut reader = BitReader::new(XoringSource::new(source, RotatingKey::new(key)));
            peek(&mut reader, &opts)
        }
        None => peek(&mut BitReader::new(source), &opts),
    };

    if let Err(e) = result {
        eprintln!("\nERROR: Failed to read LSD file");
        eprintln!("  {}", e);
        process::exit(1);
    }
}
