//! Built-in pass-through shader pair used when nothing was saved.

pub const DEFAULT_VERTEX: &str = r"precision mediump float;

attribute vec2 aVertexPosition;
attribute vec4 aVertexColor;

uniform mat4 uModelViewMatrix;
uniform mat4 uProjectionMatrix;

varying lowp vec4 vColor;

void main() {
  gl_Position = uProjectionMatrix * uModelViewMatrix * vec4(aVertexPosition, 0.0, 1.0);
  vColor = aVertexColor;
}
";

pub const DEFAULT_FRAGMENT: &str = r"precision mediump float;

uniform float uTime;
varying lowp vec4 vColor;

void main() {
  gl_FragColor = vColor;
}
";
