use super::{Config, Headless, Surface};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::io::BufRead;

/// Native implementation of a built-in. Arguments arrive in call order.
pub type Native = fn(&mut Context, &[i64]) -> i64;

/// Host resources a built-in may touch.
pub struct Context<'a> {
    pub output: &'a mut String,
    pub surface: &'a mut dyn Surface,
    pub input: &'a mut dyn BufRead,
    pub rng: &'a mut StdRng,
}

#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub arity: usize,
    pub native: Native,
}

/// ## Built-in function registry
///
/// The analyzer asks it for arities, the machine dispatches `CALL`
/// through it. It owns the surface, the input source and the random
/// generator so nothing else has to.

pub struct Builtins {
    table: HashMap<&'static str, Builtin>,
    surface: Box<dyn Surface>,
    input: Box<dyn BufRead>,
    rng: StdRng,
}

impl Default for Builtins {
    fn default() -> Builtins {
        Builtins::from_config(&Config::default())
    }
}

impl Builtins {
    pub fn new() -> Builtins {
        Builtins::default()
    }

    pub fn from_config(config: &Config) -> Builtins {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let table = TABLE
            .iter()
            .map(|&(name, arity, native)| (name, Builtin { name, arity, native }))
            .collect();
        Builtins {
            table,
            surface: Box::new(Headless::new(config.screen_width, config.screen_height)),
            input: Box::new(std::io::BufReader::new(std::io::stdin())),
            rng,
        }
    }

    pub fn with_surface(self, surface: Box<dyn Surface>) -> Builtins {
        Builtins { surface, ..self }
    }

    pub fn with_input(self, input: Box<dyn BufRead>) -> Builtins {
        Builtins { input, ..self }
    }

    pub fn with_seed(self, seed: u64) -> Builtins {
        Builtins {
            rng: StdRng::seed_from_u64(seed),
            ..self
        }
    }

    pub fn is_builtin(&self, name: &str) -> bool {
        self.table.contains_key(name)
    }

    pub fn arity(&self, name: &str) -> Option<usize> {
        self.table.get(name).map(|b| b.arity)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    pub fn surface(&self) -> &dyn Surface {
        self.surface.as_ref()
    }

    /// `None` when `name` is not a built-in.
    pub fn call(&mut self, name: &str, args: &[i64], output: &mut String) -> Option<i64> {
        let native = self.table.get(name)?.native;
        let mut context = Context {
            output,
            surface: self.surface.as_mut(),
            input: self.input.as_mut(),
            rng: &mut self.rng,
        };
        Some(native(&mut context, args))
    }
}

const TABLE: &[(&str, usize, Native)] = &[
    ("print", 1, print),
    ("input", 0, input),
    ("random", 1, random),
    ("time", 0, time),
    ("abs", 1, abs),
    ("min", 2, min),
    ("max", 2, max),
    ("keyPressed", 1, key_pressed),
    ("getScreenWidth", 0, screen_width),
    ("getScreenHeight", 0, screen_height),
    ("clearScreen", 0, clear_screen),
    ("setColor", 3, set_color),
    ("drawRectangle", 4, draw_rectangle),
    ("drawCircle", 3, draw_circle),
    ("drawLine", 4, draw_line),
];

fn arg(args: &[i64], n: usize) -> i64 {
    args.get(n).copied().unwrap_or(0)
}

fn print(ctx: &mut Context, args: &[i64]) -> i64 {
    match args.first() {
        Some(value) => ctx.output.push_str(&format!("{}\n", value)),
        None => ctx.output.push_str("[EMPTY]\n"),
    }
    0
}

fn input(ctx: &mut Context, _args: &[i64]) -> i64 {
    let mut line = String::new();
    match ctx.input.read_line(&mut line) {
        Ok(_) => line.trim().parse::<i64>().unwrap_or(0),
        Err(error) => {
            tracing::warn!(%error, "input failed");
            0
        }
    }
}

fn random(ctx: &mut Context, args: &[i64]) -> i64 {
    let max = arg(args, 0);
    if max <= 0 {
        return 0;
    }
    ctx.rng.gen_range(0..max)
}

fn time(_ctx: &mut Context, _args: &[i64]) -> i64 {
    chrono::Utc::now().timestamp()
}

fn abs(_ctx: &mut Context, args: &[i64]) -> i64 {
    arg(args, 0).wrapping_abs()
}

fn min(_ctx: &mut Context, args: &[i64]) -> i64 {
    arg(args, 0).min(arg(args, 1))
}

fn max(_ctx: &mut Context, args: &[i64]) -> i64 {
    arg(args, 0).max(arg(args, 1))
}

fn key_pressed(ctx: &mut Context, args: &[i64]) -> i64 {
    ctx.surface.is_key_pressed(arg(args, 0)) as i64
}

fn screen_width(ctx: &mut Context, _args: &[i64]) -> i64 {
    ctx.surface.width()
}

fn screen_height(ctx: &mut Context, _args: &[i64]) -> i64 {
    ctx.surface.height()
}

fn clear_screen(ctx: &mut Context, _args: &[i64]) -> i64 {
    ctx.surface.clear();
    0
}

fn set_color(ctx: &mut Context, args: &[i64]) -> i64 {
    if args.len() >= 3 {
        ctx.surface.set_color(args[0], args[1], args[2]);
    }
    0
}

fn draw_rectangle(ctx: &mut Context, args: &[i64]) -> i64 {
    if args.len() >= 4 {
        ctx.surface.draw_rectangle(args[0], args[1], args[2], args[3]);
    }
    0
}

fn draw_circle(ctx: &mut Context, args: &[i64]) -> i64 {
    if args.len() >= 3 {
        ctx.surface.draw_circle(args[0], args[1], args[2]);
    }
    0
}

fn draw_line(ctx: &mut Context, args: &[i64]) -> i64 {
    if args.len() >= 4 {
        ctx.surface.draw_line(args[0], args[1], args[2], args[3]);
    }
    0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry() {
        let builtins = Builtins::new();
        assert_eq!(builtins.len(), 15);
        assert_eq!(builtins.arity("drawRectangle"), Some(4));
        assert_eq!(builtins.arity("getScreenWidth"), Some(0));
        assert_eq!(builtins.arity("nope"), None);
        assert!(!builtins.is_builtin("Print"));
    }

    #[test]
    fn test_call() {
        let mut builtins = Builtins::new().with_input(Box::new(&b"42\nxyz\n"[..]));
        let mut out = String::new();
        assert_eq!(builtins.call("max", &[3, 9], &mut out), Some(9));
        assert_eq!(builtins.call("abs", &[-4], &mut out), Some(4));
        assert_eq!(builtins.call("getScreenHeight", &[], &mut out), Some(600));
        assert_eq!(builtins.call("input", &[], &mut out), Some(42));
        assert_eq!(builtins.call("input", &[], &mut out), Some(0));
        assert_eq!(builtins.call("print", &[7], &mut out), Some(0));
        assert_eq!(builtins.call("missing", &[], &mut out), None);
        assert_eq!(out, "7\n");
    }

    #[test]
    fn test_random_seeded() {
        let mut a = Builtins::new().with_seed(7);
        let mut b = Builtins::new().with_seed(7);
        let mut out = String::new();
        for _ in 0..10 {
            let x = a.call("random", &[6], &mut out);
            assert_eq!(x, b.call("random", &[6], &mut out));
            assert!(matches!(x, Some(n) if (0..6).contains(&n)));
        }
        assert_eq!(a.call("random", &[0], &mut out), Some(0));
    }
}
