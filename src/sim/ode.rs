//! Fixed-step ODE integration

/// One classic Runge-Kutta step for an N-component system.
///
/// `deriv` maps a state to its time derivative. Pure: the same inputs always
/// produce the same output.
pub fn rk4_step<const N: usize, F>(state: [f32; N], step: f32, deriv: F) -> [f32; N]
where
    F: Fn(&[f32; N]) -> [f32; N],
{
    let advance = |k: &[f32; N], h: f32| {
        let mut s = state;
        for (si, ki) in s.iter_mut().zip(k) {
            *si += ki * h;
        }
        s
    };

    let k1 = deriv(&state);
    let k2 = deriv(&advance(&k1, step * 0.5));
    let k3 = deriv(&advance(&k2, step * 0.5));
    let k4 = deriv(&advance(&k3, step));

    let mut next = state;
    for i in 0..N {
        next[i] += (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]) * step / 6.0;
    }
    next
}
