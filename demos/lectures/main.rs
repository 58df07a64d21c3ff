use std::time::Instant;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use diagnosis::params::VERIFY_RESULTS;
use diagnosis::{
    direct_mcs, grow_mcs, isolate_faulty, reified_mcs, shrink_mus, Diagnosis, DiagnosisError, Oracle, Problem,
};
use diagnosis_fd::expr::*;
use diagnosis_fd::{Constraint, FdOracle, Model, VarRef};
use itertools::Itertools;

/// Explains why the small over-constrained models of the constraint programming lectures have no solution.
#[derive(Parser, Debug)]
#[command()]
struct Opt {
    /// Model to diagnose
    #[arg(value_enum, default_value = "all")]
    lecture: Lecture,
    /// Diagnosis to compute
    #[arg(short, long, value_enum, default_value = "all")]
    algorithm: Algorithm,
    /// Check each diagnosis against the oracle before printing it
    #[arg(long)]
    verify: bool,
    /// Logging level to use: one of "error", "warn", "info", "debug", "trace"
    #[arg(short, long, default_value = "warn")]
    log_level: tracing::Level,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Lecture {
    All,
    /// `x != 3` and `x == 3`
    Conflict,
    /// Two booleans fixed to true, and an implication forbidding them to be both true
    Implication,
    /// A graph that cannot be coloured with three colours
    Colouring,
    /// A model on which the solver fails
    Bugged,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Algorithm {
    All,
    Mus,
    McsGrow,
    McsReified,
    McsDirect,
}

impl Algorithm {
    const ALL: [Algorithm; 4] = [
        Algorithm::Mus,
        Algorithm::McsGrow,
        Algorithm::McsReified,
        Algorithm::McsDirect,
    ];

    fn selected(self, requested: Algorithm) -> bool {
        requested == Algorithm::All || requested == self
    }
}

struct Lesson {
    name: &'static str,
    model: Model,
    /// Variables shown in solutions
    vars: Vec<VarRef>,
    hard: Vec<Constraint>,
    soft: Vec<Constraint>,
}

impl Lecture {
    const ALL: [Lecture; 4] = [Lecture::Conflict, Lecture::Implication, Lecture::Colouring, Lecture::Bugged];

    fn lesson(self) -> Lesson {
        let mut model = Model::new();
        match self {
            Lecture::All => unreachable!(),
            Lecture::Conflict => {
                let x = model.new_ivar(-2, 5, "x");
                let soft = vec![neq(x, 3), lt(x, 5), eq(x, 3)];
                Lesson {
                    name: "conflict",
                    model,
                    vars: vec![x.into()],
                    hard: vec![],
                    soft,
                }
            }
            Lecture::Implication => {
                let a = model.new_bvar("a");
                let b = model.new_bvar("b");
                Lesson {
                    name: "implication",
                    model,
                    vars: vec![a.into(), b.into()],
                    hard: vec![a.into(), b.into()],
                    soft: vec![a.into(), b.into(), implies(a, not(b))],
                }
            }
            Lecture::Colouring => {
                let nodes = (0..5).map(|i| model.new_ivar(1, 3, format!("node[{i}]"))).collect_vec();
                let edges = [(0, 1), (0, 2), (0, 3), (1, 2), (1, 3), (2, 3), (3, 4), (0, 4)];
                Lesson {
                    name: "graph colouring",
                    model,
                    vars: nodes.iter().map(|&n| n.into()).collect(),
                    hard: vec![],
                    soft: edges.iter().map(|&(i, j)| neq(nodes[i], nodes[j])).collect(),
                }
            }
            Lecture::Bugged => {
                let iv = model.new_ivar(-2, 5, "IV");
                let bv = model.new_bvar("BV");
                Lesson {
                    name: "bugged",
                    model,
                    vars: vec![iv.into(), bv.into()],
                    hard: vec![],
                    soft: vec![neq(iv, 3), eq(bv, 1), gt(5 % iv, 2)],
                }
            }
        }
    }
}

fn format_diagnosis(model: &Model, diagnosis: &Diagnosis<Constraint>) -> String {
    diagnosis.iter().map(|c| format!("[{}]", model.display(c))).join(" ")
}

/// A solution of the model once the constraints of `mcs` are removed.
fn format_witness(oracle: &mut FdOracle, lesson: &Lesson, mcs: &Diagnosis<Constraint>) -> Result<String> {
    let kept = lesson
        .hard
        .iter()
        .cloned()
        .chain(mcs.complement().into_iter().map(|i| lesson.soft[i].clone()))
        .collect_vec();
    let outcome = oracle.solve(&kept)?;
    Ok(match outcome.assignment() {
        Some(solution) => lesson
            .vars
            .iter()
            .map(|&v| format!("{}={}", oracle.model().label(v), solution.value(v)))
            .join(" "),
        None => "none".to_string(),
    })
}

fn run(lesson: Lesson, requested: Algorithm) -> Result<()> {
    println!("=== {} ===", lesson.name);
    let mut oracle = FdOracle::new(lesson.model.clone());
    let pb = Problem::new(&lesson.soft).with_hard(&lesson.hard);
    let mut oracle_failed = false;

    for algorithm in Algorithm::ALL.into_iter().filter(|a| a.selected(requested)) {
        let start = Instant::now();
        let result = match algorithm {
            Algorithm::Mus => shrink_mus(&mut oracle, pb),
            Algorithm::McsGrow => grow_mcs(&mut oracle, pb),
            Algorithm::McsReified => reified_mcs(&mut oracle, pb),
            Algorithm::McsDirect => direct_mcs(&mut oracle, pb),
            Algorithm::All => unreachable!(),
        };
        tracing::info!(?algorithm, elapsed = ?start.elapsed());
        let name = format!("{algorithm:?}");
        match result {
            Ok(diagnosis) => {
                println!("{name:<12} {}", format_diagnosis(oracle.model(), &diagnosis));
                if algorithm != Algorithm::Mus {
                    println!("{:<12} {}", "  solution", format_witness(&mut oracle, &lesson, &diagnosis)?);
                }
            }
            Err(err @ DiagnosisError::OracleUnavailable(_)) => {
                oracle_failed = true;
                println!("{name:<12} {err}")
            }
            Err(err) => println!("{name:<12} {err}"),
        }
    }

    if oracle_failed {
        if let Some(faulty) = isolate_faulty(&mut oracle, &lesson.soft)? {
            println!(
                "{:<12} [{}] ({})",
                "Faulty",
                oracle.model().display(&lesson.soft[faulty.position]),
                faulty.error
            );
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let opt = Opt::parse();

    let subscriber = tracing_subscriber::fmt()
        .with_timer(tracing_subscriber::fmt::time::Uptime::from(Instant::now()))
        .with_writer(std::io::stderr)
        .with_max_level(opt.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if opt.verify {
        VERIFY_RESULTS.set(true);
    }

    for lecture in Lecture::ALL {
        if opt.lecture == Lecture::All || opt.lecture == lecture {
            run(lecture.lesson(), opt.algorithm)?;
        }
    }
    Ok(())
}
