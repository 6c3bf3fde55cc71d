use pixel8::{
    Ease, Immediate, Node, Overflow, PngSequence, RenderLoop, RenderLoopOpts, Timer, TimerOpts,
    TransitionValue,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut bounce = Timer::new(TimerOpts {
        duration: 24,
        reverse: true,
        ease: Ease::InOutQuad,
        ..TimerOpts::default()
    });
    let producer = move |info: &pixel8::FrameInfo| {
        bounce.next();
        let y = 4.0 + (bounce.value() * 40.0).round();
        // Shadow shrinks while the ball is high; the transition smooths the jumps.
        let shadow_w = if y > 24.0 { 16.0 } else { 8.0 };
        Node::stage(64, 64)
            .background("#1d2b53")
            .scale(4)
            .fps(30.0)
            .children([
                Node::rect(0.0, 52.0, 64.0, 12.0)
                    .fill("#008751")
                    .overflow(Overflow::Repeat)
                    .child(
                        Node::rect((info.frame.0 % 64) as f64, 2.0, 8.0, 2.0).fill("#00e436"),
                    ),
                Node::transition(vec![
                    TransitionValue::new("x", 6).ease(Ease::OutCubic),
                    TransitionValue::new("width", 6).ease(Ease::OutCubic),
                ])
                .child(
                    Node::rect(32.0 - shadow_w / 2.0, 54.0, shadow_w, 3.0)
                        .border_radius(1.0)
                        .fill("rgba(0,0,0,0.5)"),
                ),
                Node::circ(32.0, y, 6.0).fill("#ff004d"),
                Node::textbox(2.0, 2.0, 60.0, format!("FRAME {}", info.frame.0))
                    .color("#fff1e8")
                    .fixed(),
            ])
    };

    let opts = RenderLoopOpts {
        max_frames: Some(96),
        ..RenderLoopOpts::from_env()
    };
    let out_dir = std::path::Path::new("target").join("bouncing_ball");
    let mut lp = RenderLoop::new(producer).with_opts(opts);
    let mut presenter = PngSequence::new(&out_dir);
    let frames = lp.run(&mut presenter, &mut Immediate::default())?;

    eprintln!("wrote {frames} frames to {}", out_dir.display());
    Ok(())
}
