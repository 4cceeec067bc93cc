use scriptbind::NativeClass;

#[derive(NativeClass)]
#[script(name = "Player", frobnicate)]
struct Player {
    hp: u32,
}

fn main() {}
