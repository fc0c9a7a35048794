use std::process;

use clap::{Parser, ValueEnum};

use armlet::{END_OF_INPUT, IN, Machine, OUT, Program, R0, R1, R2, Result, RoutineBuilder};

#[derive(Parser, Debug)]
#[command(name = "armlet")]
#[command(about = "Run a built-in demo program on the armlet virtual CPU", long_about = None)]
struct Args {
    /// Demo program to run
    #[arg(long, value_enum, default_value_t = Demo::Star)]
    demo: Demo,

    /// Trace each executed instruction to stderr
    #[arg(long)]
    trace: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Demo {
    /// Print "*\n" and exit 0
    Star,
    /// Copy stdin to stdout until end of input
    Echo,
    /// Push two characters and pop them in reverse order
    Stack,
}

fn star() -> Result<Program> {
    let mut asm = RoutineBuilder::new();
    asm.mov(R1, u32::from(b'*'));
    asm.str(R1, OUT);
    asm.mov(R1, u32::from(b'\n'));
    asm.str(R1, OUT);
    asm.mov(R0, 0u32);
    asm.halt();
    Ok(Program::from_body(asm.build()?))
}

fn echo() -> Result<Program> {
    let mut asm = RoutineBuilder::new();
    let top = asm.new_label();
    let done = asm.new_label();
    asm.bind(top)?;
    asm.ldr(R1, IN);
    asm.cmp(R1, END_OF_INPUT);
    asm.beq(done);
    asm.str(R1, OUT);
    asm.b(top);
    asm.bind(done)?;
    asm.mov(R0, 0u32);
    asm.halt();
    Ok(Program::from_body(asm.build()?))
}

fn stack() -> Result<Program> {
    let mut pb = Program::builder();
    let emit = pb.declare("emit");

    // emit: pop a character and write it out.
    let mut proc_asm = RoutineBuilder::new();
    proc_asm.pop(R2);
    proc_asm.str(R2, OUT);
    proc_asm.ret();
    pb.define(emit, proc_asm.build()?);

    // Push 'a' then 'b'; the pops print "ba\n".
    let mut asm = RoutineBuilder::new();
    asm.mov(R1, u32::from(b'a'));
    asm.push(R1);
    asm.mov(R1, u32::from(b'b'));
    asm.push(R1);
    asm.bsr(emit);
    asm.bsr(emit);
    asm.mov(R1, u32::from(b'\n'));
    asm.str(R1, OUT);
    asm.mov(R0, 0u32);
    asm.halt();
    pb.build(asm.build()?)
}

fn main() {
    let args = Args::parse();

    if args.trace {
        tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_writer(std::io::stderr)
            .init();
    }

    let program = match args.demo {
        Demo::Star => star(),
        Demo::Echo => echo(),
        Demo::Stack => stack(),
    }
    .expect("demo programs are statically well-formed");

    let mut machine = Machine::new();
    match machine.run(&program) {
        Ok(status) => process::exit((status & 0xFF) as i32),
        Err(err) => {
            eprintln!("fail:{err}");
            process::exit(1);
        }
    }
}
